// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, UNSIGNED_HEADERS, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE,
    X_AMZ_SECURITY_TOKEN,
};
use crate::SigningContext;
use http::header;
use iotsign_core::hash::hex_sha256;
use iotsign_core::{Error, Result, SigningRequest};
use percent_encoding::utf8_percent_encode;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Canonical form of a request as defined by SigV4.
///
/// ```text
/// <method>\n
/// <canonical uri>\n
/// <canonical query>\n
/// <name>:<value>\n   (one line per signed header)
/// \n
/// <signed headers>\n
/// <payload hash>
/// ```
///
/// Headers live in a [`BTreeMap`] so they are always sorted bytewise by
/// their lowercase names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    headers: BTreeMap<String, String>,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request for `req` signed within `ctx`.
    ///
    /// `x-amz-date` and `x-amz-content-sha256` always reflect `ctx` and
    /// `payload_hash`, replacing whatever the caller put there.
    pub fn build(
        req: &SigningRequest,
        ctx: &SigningContext,
        payload_hash: &str,
        session_token: Option<&str>,
    ) -> Result<Self> {
        let mut headers = canonical_headers(req)?;
        headers.insert(X_AMZ_DATE.to_string(), ctx.timestamp().to_string());
        headers.insert(X_AMZ_CONTENT_SHA_256.to_string(), payload_hash.to_string());
        if let Some(token) = session_token {
            headers.insert(X_AMZ_SECURITY_TOKEN.to_string(), token.to_string());
        }

        let signed_headers = headers.keys().map(|k| k.as_str()).collect::<Vec<_>>().join(";");

        Ok(Self {
            method: req.method.as_str().to_uppercase(),
            uri: canonical_uri(&req.path),
            query: canonical_query(&req.query),
            headers,
            signed_headers,
            payload_hash: payload_hash.to_string(),
        })
    }

    /// Semicolon separated, sorted names of the signed headers.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Value of a signed header, if it is part of the canonical request.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    /// Payload hash carried on the last line.
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// Lowercase hex SHA-256 of the canonical request string.
    pub fn hash(&self) -> String {
        hex_sha256(self.to_string().as_bytes())
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Canonicalize a request path exactly as it appears on the wire.
///
/// Every byte outside the unreserved set (except `/`) is encoded, including
/// the `%` of existing escapes, so `%24` becomes `%2524`.
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    utf8_percent_encode(path, &AWS_URI_ENCODE_SET).to_string()
}

/// Canonicalize decoded query pairs.
///
/// Pairs are encoded first and then sorted by key, ties broken by value.
pub fn canonical_query(query: &[(String, String)]) -> String {
    let pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();

    SigningRequest::pairs_to_string(pairs, "=", "&")
}

fn canonical_headers(req: &SigningRequest) -> Result<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();

    for name in req.headers.keys() {
        if UNSIGNED_HEADERS.contains(&name.as_str()) {
            continue;
        }

        let mut values = Vec::new();
        for value in req.headers.get_all(name) {
            values.push(SigningRequest::header_value_normalize(value.to_str()?));
        }
        headers.insert(name.as_str().to_string(), values.join(","));
    }

    if !headers.contains_key(header::HOST.as_str()) {
        let Some(authority) = &req.authority else {
            return Err(Error::request_invalid(
                "request has neither a host header nor an authority",
            ));
        };
        headers.insert(header::HOST.to_string(), authority.as_str().to_string());
    }

    Ok(headers)
}

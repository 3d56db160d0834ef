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

use std::mem;

use http::uri::Authority;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::Result;

/// Signing context for request.
///
/// It describes the request to sign: method, target uri and headers. Headers
/// are keyed by [`http::HeaderName`], so names are always lowercase and lookups are
/// case-insensitive. The payload is not part of it and is passed next to it.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP authority, used as `host` if the request carries no host header.
    pub authority: Option<Authority>,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,

    uri: Uri,
}

impl SigningRequest {
    /// Create a signing request from its parts.
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let path = uri.path().to_string();
        let query = uri
            .query()
            .map(|v| {
                form_urlencoded::parse(v.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        SigningRequest {
            method,
            authority: uri.authority().cloned(),
            path,
            query,
            headers,
            uri,
        }
    }

    /// Build a signing request from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri);

        // Take the headers out of the request to avoid copy.
        // We will return it back when apply the context.
        let headers = mem::take(&mut parts.headers);

        Ok(Self::new(parts.method.clone(), uri, headers))
    }

    /// Apply the signing request back to http::request::Parts.
    ///
    /// The uri is returned untouched: signing never rewrites path or query.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = self.uri;

        Ok(())
    }

    /// Normalize header value.
    ///
    /// Leading and trailing whitespace is removed and every inner run of
    /// whitespace becomes a single space.
    pub fn header_value_normalize(v: &str) -> String {
        let mut s = String::with_capacity(v.len());
        for (idx, word) in v.split_ascii_whitespace().enumerate() {
            if idx != 0 {
                s.push(' ');
            }
            s.push_str(word);
        }

        s
    }

    /// Convert sorted pairs to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn pairs_to_string(mut pairs: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        pairs.sort();

        for (idx, (k, v)) in pairs.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }
}

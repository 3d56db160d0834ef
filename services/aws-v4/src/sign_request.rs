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
    ALGORITHM, SCOPE_TERMINATOR, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::{CanonicalRequest, Config, Credential, CredentialScope, SigningContext};
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderMap, HeaderValue};
use iotsign_core::hash::{hex_hmac_sha256, hex_sha256_payload, hmac_sha256};
use iotsign_core::time::{now, DateTime};
use iotsign_core::utils::Redact;
use iotsign_core::{Context, Error, Result, SignRequest, SigningRequest};
use log::debug;
use std::fmt::{Debug, Formatter};

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html)
///
/// The signer holds no credential and no derived key: each call receives its
/// own credential snapshot and derives everything it needs from scratch, so a
/// single signer can be shared between any number of tasks.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for AWS V4 signer.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Create a signer from the region and service of a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let region = config
            .region
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("region is not configured"))?;
        let service = config
            .service
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("service is not configured"))?;

        Ok(Self::new(service, region))
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Service this signer signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region this signer signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign `req` with the configured time, or the current time if none.
    pub fn sign(
        &self,
        req: &SigningRequest,
        payload: &[u8],
        cred: &Credential,
    ) -> Result<SigningOutput> {
        self.sign_at(req, payload, cred, self.time.unwrap_or_else(now))
    }

    /// Sign `req` at the given clock reading.
    ///
    /// The result depends on nothing but the arguments: same inputs, same
    /// Authorization header.
    pub fn sign_at(
        &self,
        req: &SigningRequest,
        payload: &[u8],
        cred: &Credential,
        time: DateTime,
    ) -> Result<SigningOutput> {
        if cred.access_key_id().is_empty() {
            return Err(Error::credential_invalid("access key id is empty"));
        }

        let ctx = SigningContext::new(&self.region, &self.service, time);
        let scope = ctx.scope();
        debug!("calculated scope: {scope}");

        let payload_hash = hex_sha256_payload(payload);
        let creq =
            CanonicalRequest::build(req, &ctx, &payload_hash, cred.session_token())?;

        let string_to_sign = string_to_sign(&ctx, &creq.hash());
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(
            cred.secret_access_key(),
            ctx.date(),
            ctx.region(),
            ctx.service(),
        )?;
        let signature = calculate_signature(&signing_key, &string_to_sign)?;

        Ok(SigningOutput {
            authorization: authorization_header(
                cred.access_key_id(),
                &scope,
                creq.signed_headers(),
                &signature,
            ),
            x_amz_date: ctx.timestamp().to_string(),
            x_amz_content_sha256: payload_hash,
            x_amz_security_token: cred.session_token().map(str::to_string),
        })
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("no credential to sign with"));
        };

        let mut signed_req = SigningRequest::build(req)?;

        // Insert HOST header if not present.
        if !signed_req.headers.contains_key(header::HOST) {
            if let Some(authority) = &signed_req.authority {
                let value = HeaderValue::from_str(authority.as_str())?;
                signed_req.headers.insert(header::HOST, value);
            }
        }

        let output = match self.sign(&signed_req, body, cred) {
            Ok(output) => output,
            Err(err) => {
                // Hand the untouched headers back before reporting.
                signed_req.apply(req)?;
                return Err(err);
            }
        };
        output.apply(&mut signed_req.headers)?;

        // Apply to the request.
        signed_req.apply(req)
    }
}

/// Headers produced by one signing call.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningOutput {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `x-amz-date` header.
    pub x_amz_date: String,
    /// Value of the `x-amz-content-sha256` header.
    pub x_amz_content_sha256: String,
    /// Value of the `x-amz-security-token` header, for session credentials.
    pub x_amz_security_token: Option<String>,
}

impl SigningOutput {
    /// Write the signing headers into `headers`, replacing existing values.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        let mut authorization = HeaderValue::from_str(&self.authorization)?;
        authorization.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, authorization);

        headers.insert(X_AMZ_DATE, HeaderValue::from_str(&self.x_amz_date)?);
        headers.insert(
            X_AMZ_CONTENT_SHA_256,
            HeaderValue::from_str(&self.x_amz_content_sha256)?,
        );

        if let Some(token) = &self.x_amz_security_token {
            let mut value = HeaderValue::from_str(token)?;
            // Set token value sensitive to valid leaking.
            value.set_sensitive(true);
            headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }

        Ok(())
    }
}

impl Debug for SigningOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningOutput")
            .field("authorization", &self.authorization)
            .field("x_amz_date", &self.x_amz_date)
            .field("x_amz_content_sha256", &self.x_amz_content_sha256)
            .field(
                "x_amz_security_token",
                &Redact::from(&self.x_amz_security_token),
            )
            .finish()
    }
}

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(ctx: &SigningContext, canonical_request_hash: &str) -> String {
    format!(
        "{ALGORITHM}\n{}\n{}\n{canonical_request_hash}",
        ctx.timestamp(),
        ctx.scope()
    )
}

/// Derive the signing key for one date, region and service.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn generate_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(Error::credential_invalid("secret access key is empty"));
    }

    let secret = format!("AWS4{secret}");
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
    let sign_region = hmac_sha256(&sign_date, region.as_bytes())?;
    let sign_service = hmac_sha256(&sign_region, service.as_bytes())?;
    hmac_sha256(&sign_service, SCOPE_TERMINATOR.as_bytes())
}

/// Lowercase hex HMAC-SHA256 of the string to sign under the derived key.
pub fn calculate_signature(signing_key: &[u8], string_to_sign: &str) -> Result<String> {
    hex_hmac_sha256(signing_key, string_to_sign.as_bytes())
}

/// Assemble the `Authorization` header value.
pub fn authorization_header(
    access_key_id: &str,
    scope: &CredentialScope,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{ALGORITHM} Credential={access_key_id}/{scope}, SignedHeaders={signed_headers}, Signature={signature}"
    )
}

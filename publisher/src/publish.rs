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

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST};
use http::{HeaderValue, Request, Uri};
use iotsign_aws_v4::Credential;
use iotsign_core::{Error, Result, Signer};
use log::{debug, info, warn};

use crate::Thermostat;

/// Publisher sends signed messages to one AWS IoT topic endpoint.
///
/// Every call builds a fresh request, signs it with a fresh credential
/// snapshot, and sends it through the signer's context.
#[derive(Debug, Clone)]
pub struct Publisher {
    signer: Signer<Credential>,
    endpoint: Uri,
    host: HeaderValue,
    content_type: HeaderValue,
}

impl Publisher {
    /// Create a publisher for `endpoint`, which must be an absolute url.
    pub fn new(signer: Signer<Credential>, endpoint: Uri, content_type: &str) -> Result<Self> {
        let Some(authority) = endpoint.authority() else {
            return Err(Error::request_invalid(format!(
                "publish endpoint {endpoint} has no host"
            )));
        };
        let host = HeaderValue::from_str(authority.as_str())?;
        let content_type = HeaderValue::from_str(content_type)?;

        Ok(Self {
            signer,
            endpoint,
            host,
            content_type,
        })
    }

    /// The endpoint messages are published to.
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// Publish `payload` and return the response body.
    ///
    /// Any non-2xx response is an error carrying the status and body.
    pub async fn publish(&self, payload: Bytes) -> Result<String> {
        let req = Request::post(self.endpoint.clone())
            .header(HOST, self.host.clone())
            .header(CONTENT_TYPE, self.content_type.clone())
            .header(CONTENT_LENGTH, payload.len())
            .body(())?;

        let (mut parts, _) = req.into_parts();
        self.signer.sign(&mut parts, &payload).await?;
        let req = Request::from_parts(parts, payload);

        debug!("sending publish request to {}", self.endpoint);
        let resp = self.signer.context().http_send_as_string(req).await?;
        let status = resp.status();
        let body = resp.into_body();

        if !status.is_success() {
            return Err(Error::unexpected(format!(
                "publish to {} failed with status {status}: {body}",
                self.endpoint
            )));
        }

        if body.contains("OK") {
            info!("published message to {}", self.endpoint);
        } else {
            warn!("publish to {} returned unexpected body: {body}", self.endpoint);
        }

        Ok(body)
    }

    /// Publish one random thermostat reading.
    pub async fn publish_thermostat(&self) -> Result<String> {
        let reading = Thermostat::random();
        debug!("publishing thermostat reading: {reading:?}");

        self.publish(reading.to_json()?).await
    }
}

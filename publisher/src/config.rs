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

use http::Uri;
use iotsign_core::{Context, Error, Result};
use serde::Deserialize;
use std::time::Duration;

pub const IOTSIGN_ENDPOINT: &str = "IOTSIGN_ENDPOINT";
pub const IOTSIGN_CONTENT_TYPE: &str = "IOTSIGN_CONTENT_TYPE";
pub const IOTSIGN_PUBLISH_INTERVAL: &str = "IOTSIGN_PUBLISH_INTERVAL";
pub const IOTSIGN_CONFIG_FILE: &str = "IOTSIGN_CONFIG_FILE";

const DEFAULT_CONTENT_TYPE: &str = "application/json";
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Settings of the publish loop.
///
/// Filled the same way as [`iotsign_aws_v4::Config`]: explicit values first,
/// then environment, then the JSON settings file. Unset fields fall back to
/// their defaults only when read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Full publish url, e.g. `https://<prefix>-ats.iot.<region>.amazonaws.com/topics/<topic>?qos=1`.
    #[serde(alias = "requesturl")]
    pub endpoint: Option<String>,
    /// Content type of the payload, `application/json` by default.
    #[serde(alias = "contenttype")]
    pub content_type: Option<String>,
    /// Seconds between two publishes, 5 by default.
    pub interval_secs: Option<u64>,
}

impl PublisherConfig {
    /// Fill unset fields from environment variables.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        let var = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        if self.endpoint.is_none() {
            self.endpoint = var(IOTSIGN_ENDPOINT);
        }
        if self.content_type.is_none() {
            self.content_type = var(IOTSIGN_CONTENT_TYPE);
        }
        if self.interval_secs.is_none() {
            if let Some(v) = var(IOTSIGN_PUBLISH_INTERVAL) {
                let secs = v.parse().map_err(|e| {
                    Error::config_invalid(format!(
                        "{IOTSIGN_PUBLISH_INTERVAL} must be a number of seconds, got {v}"
                    ))
                    .with_source(e)
                })?;
                self.interval_secs = Some(secs);
            }
        }

        Ok(self)
    }

    /// Fill unset fields from a JSON settings file.
    pub async fn from_file(mut self, ctx: &Context, path: &str) -> Result<Self> {
        let content = ctx.file_read(path).await?;
        let file: PublisherConfig = serde_json::from_slice(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse settings file {path}")).with_source(e)
        })?;

        self.endpoint = self.endpoint.or(file.endpoint);
        self.content_type = self.content_type.or(file.content_type);
        self.interval_secs = self.interval_secs.or(file.interval_secs);
        Ok(self)
    }

    /// Publish url, which must be absolute.
    pub fn endpoint(&self) -> Result<Uri> {
        let Some(endpoint) = &self.endpoint else {
            return Err(Error::config_invalid("publish endpoint is not configured"));
        };

        let uri: Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid(format!("publish endpoint {endpoint} is not a valid url"))
                .with_source(e)
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "publish endpoint {endpoint} must be an absolute url"
            )));
        }

        Ok(uri)
    }

    /// Content type of the payload.
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Time between two publishes.
    pub fn interval(&self) -> Result<Duration> {
        match self.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS) {
            0 => Err(Error::config_invalid("publish interval must be positive")),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

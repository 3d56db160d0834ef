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

use crate::constants::*;
use crate::Credential;
use iotsign_core::utils::Redact;
use iotsign_core::{Context, Error, Result};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// Config for aws services.
///
/// One value carries everything the signer needs. It can be filled from
/// several backends which only ever fill fields that are still unset, so the
/// order of calls sets the precedence:
///
/// ```no_run
/// use iotsign_aws_v4::Config;
/// use iotsign_core::{Context, OsEnv};
///
/// # async fn example() -> iotsign_core::Result<()> {
/// let ctx = Context::new().with_env(OsEnv);
/// let config = Config {
///     service: Some("iotdevicegateway".to_string()),
///     ..Default::default()
/// }
/// .from_env(&ctx)
/// .from_file(&ctx, "appsettings.json")
/// .await?;
/// # let _ = config;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ACCESS_KEY_ID`
    /// - settings file key `access_key_id` or `accesskey`
    #[serde(alias = "accesskey")]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SECRET_ACCESS_KEY`
    /// - settings file key `secret_access_key` or `secretkey`
    #[serde(alias = "secretkey")]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SESSION_TOKEN`
    /// - settings file key `session_token` or `sessiontoken`
    #[serde(alias = "sessiontoken")]
    pub session_token: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_REGION`, then `AWS_DEFAULT_REGION`
    /// - settings file key `region`
    pub region: Option<String>,
    /// `service` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `IOTSIGN_SERVICE`
    /// - settings file key `service`
    pub service: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl Config {
    /// Fill unset fields from environment variables.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let var = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        if self.access_key_id.is_none() {
            self.access_key_id = var(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = var(AWS_SECRET_ACCESS_KEY);
        }
        if self.session_token.is_none() {
            self.session_token = var(AWS_SESSION_TOKEN);
        }
        if self.region.is_none() {
            self.region = var(AWS_REGION).or_else(|| var(AWS_DEFAULT_REGION));
        }
        if self.service.is_none() {
            self.service = var(IOTSIGN_SERVICE);
        }

        self
    }

    /// Fill unset fields from a JSON settings file.
    ///
    /// Keys the config does not know about are ignored, so the same file
    /// can carry publisher settings too.
    pub async fn from_file(self, ctx: &Context, path: &str) -> Result<Self> {
        let content = ctx.file_read(path).await?;
        let file: Config = serde_json::from_slice(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse settings file {path}")).with_source(e)
        })?;

        Ok(self.merge(file))
    }

    /// Fill unset fields from `other`.
    pub fn merge(mut self, other: Config) -> Self {
        self.access_key_id = self.access_key_id.or(other.access_key_id);
        self.secret_access_key = self.secret_access_key.or(other.secret_access_key);
        self.session_token = self.session_token.or(other.session_token);
        self.region = self.region.or(other.region);
        self.service = self.service.or(other.service);
        self
    }

    /// Credential snapshot held by this config, if both keys are present.
    pub fn credential(&self) -> Option<Credential> {
        let (Some(ak), Some(sk)) = (&self.access_key_id, &self.secret_access_key) else {
            return None;
        };

        let cred = Credential::new(ak.as_str(), sk.as_str());
        Some(match &self.session_token {
            Some(token) => cred.with_session_token(token.as_str()),
            None => cred,
        })
    }
}

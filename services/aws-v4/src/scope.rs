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

use crate::constants::SCOPE_TERMINATOR;
use chrono::SubsecRound;
use iotsign_core::time::{format_date, format_iso8601, DateTime};
use std::fmt::{Display, Formatter};

/// Everything a single signing call knows about where and when it signs.
///
/// Built fresh for every call from the caller's clock reading. The time is
/// truncated to whole seconds since that is all the wire format carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    region: String,
    service: String,
    time: DateTime,
    date: String,
    timestamp: String,
}

impl SigningContext {
    /// Create a signing context for the given region, service and time.
    pub fn new(region: &str, service: &str, time: DateTime) -> Self {
        let time = time.trunc_subsecs(0);
        Self {
            region: region.to_string(),
            service: service.to_string(),
            time,
            date: format_date(time),
            timestamp: format_iso8601(time),
        }
    }

    /// Region this context signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service this context signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Signing time with second precision.
    pub fn time(&self) -> DateTime {
        self.time
    }

    /// Date string in `yyyyMMdd`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Timestamp string in `yyyyMMddTHHmmssZ`, the value of `x-amz-date`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Credential scope bound to this context.
    pub fn scope(&self) -> CredentialScope {
        CredentialScope {
            date: self.date.clone(),
            region: self.region.clone(),
            service: self.service.clone(),
        }
    }
}

/// Credential scope: `<date>/<region>/<service>/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    date: String,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Date part of the scope.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Region part of the scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service part of the scope.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, SCOPE_TERMINATOR
        )
    }
}

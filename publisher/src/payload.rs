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
use iotsign_core::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A thermostat reading, the message published on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thermostat {
    /// Device id in `0..10000`.
    #[serde(rename = "ThermostatID")]
    pub thermostat_id: u32,
    /// Target temperature in `32..100`.
    #[serde(rename = "SetPoint")]
    pub set_point: u32,
    /// Measured temperature in `32..100`.
    #[serde(rename = "CurrentTemperature")]
    pub current_temperature: u32,
}

impl Thermostat {
    /// Generate a random reading from the thread local rng.
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    /// Generate a random reading from `rng`.
    pub fn random_with<R: Rng>(rng: &mut R) -> Self {
        Self {
            thermostat_id: rng.gen_range(0..10000),
            set_point: rng.gen_range(32..100),
            current_temperature: rng.gen_range(32..100),
        }
    }

    /// Serialize into the JSON body sent to AWS IoT.
    pub fn to_json(&self) -> Result<Bytes> {
        let body = serde_json::to_vec(self)
            .map_err(|e| Error::unexpected("failed to serialize thermostat reading").with_source(e))?;
        Ok(Bytes::from(body))
    }
}

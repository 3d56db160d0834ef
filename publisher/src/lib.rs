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

//! Periodic publisher of signed thermostat readings to AWS IoT.
//!
//! The loop is kept apart from the signing engine: [`Scheduler`] only knows
//! about a task and an [`ErrorSink`], [`Publisher`] only knows how to build,
//! sign and send one message.
//!
//! ```no_run
//! use iotsign_aws_v4::{DefaultCredentialProvider, RequestSigner};
//! use iotsign_core::{Context, OsEnv, Signer};
//! use iotsign_http_send_reqwest::ReqwestHttpSend;
//! use iotsign_publisher::{Publisher, Scheduler};
//! use std::time::Duration;
//!
//! # async fn example() -> iotsign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new("iotdevicegateway", "us-east-1"),
//! );
//! let publisher = Publisher::new(
//!     signer,
//!     "https://example-ats.iot.us-east-1.amazonaws.com/topics/topic1?qos=1".parse()?,
//!     "application/json",
//! )?;
//!
//! Scheduler::new(Duration::from_secs(5))?
//!     .run(|| publisher.publish_thermostat(), async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::{
    PublisherConfig, IOTSIGN_CONFIG_FILE, IOTSIGN_CONTENT_TYPE, IOTSIGN_ENDPOINT,
    IOTSIGN_PUBLISH_INTERVAL,
};

mod payload;
pub use payload::Thermostat;

mod publish;
pub use publish::Publisher;

mod scheduler;
pub use scheduler::{ErrorSink, LogErrorSink, Scheduler};

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

//! AWS SigV4 signing for AWS IoT HTTP publish requests.
//!
//! This crate turns a request descriptor and a credential snapshot into the
//! `Authorization`, `x-amz-date` and `x-amz-content-sha256` headers that the
//! AWS IoT data plane verifies.
//!
//! ## Quick Start
//!
//! ```no_run
//! use iotsign_aws_v4::{DefaultCredentialProvider, RequestSigner};
//! use iotsign_core::{Context, OsEnv, Signer};
//! use iotsign_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> iotsign_core::Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new("iotdevicegateway", "us-east-1"),
//! );
//!
//! let body = br#"{"ThermostatID":1}"#;
//! let mut parts = http::Request::post(
//!     "https://example-ats.iot.us-east-1.amazonaws.com/topics/topic1?qos=1",
//! )
//! .header("content-type", "application/json")
//! .body(())
//! .unwrap()
//! .into_parts()
//! .0;
//! signer.sign(&mut parts, body).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`RequestSigner::sign_at`] is the synchronous core: it borrows a
//! [`iotsign_core::SigningRequest`] and a [`Credential`] and returns a
//! [`SigningOutput`] without touching any shared state.
//!
//! ## Credential Sources
//!
//! - [`StaticCredentialProvider`]: keys known up front
//! - [`EnvCredentialProvider`]: `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
//! - [`ConfigCredentialProvider`]: keys from a layered [`Config`]
//! - [`ProfileCredentialProvider`]: `~/.aws/credentials`
//! - [`DefaultCredentialProvider`]: env, then profile

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod scope;
pub use scope::{CredentialScope, SigningContext};

mod canonical;
pub use canonical::{canonical_query, canonical_uri, CanonicalRequest};

mod sign_request;
pub use sign_request::{
    authorization_header, calculate_signature, generate_signing_key, string_to_sign,
    RequestSigner, SigningOutput,
};

mod provide_credential;
pub use provide_credential::*;

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

use super::*;
use anyhow::Result;
use bytes::Bytes;
use http::StatusCode;
use iotsign_aws_v4::{Config, DefaultCredentialProvider};
use iotsign_core::{Context, OsEnv, Signer};
use iotsign_file_read_tokio::TokioFileRead;
use iotsign_http_send_reqwest::ReqwestHttpSend;
use log::{debug, warn};
use std::env;

/// Initialize test environment
fn init_live_test() -> Option<(Signer<Credential>, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("IOTSIGN_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config {
        service: Some("iotdevicegateway".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);
    let builder = RequestSigner::from_config(&config).expect("AWS_REGION must be set");
    let endpoint = env::var("IOTSIGN_ENDPOINT").expect("IOTSIGN_ENDPOINT must be set");

    Some((
        Signer::new(ctx, DefaultCredentialProvider::new(), builder),
        endpoint,
    ))
}

async fn publish(signer: &Signer<Credential>, endpoint: &str, body: &str) -> Result<StatusCode> {
    let req = http::Request::post(endpoint)
        .header("content-type", "application/json")
        .body(Bytes::from(body.to_string()))?;

    let (mut parts, body) = req.into_parts();
    signer.sign(&mut parts, &body).await?;
    let req = http::Request::from_parts(parts, body);
    debug!("signed request: {req:?}");

    let resp = signer.context().http_send_as_string(req).await?;
    debug!("got response: {:?}", resp.body());
    Ok(resp.status())
}

#[tokio::test]
async fn test_publish() -> Result<()> {
    let Some((signer, endpoint)) = init_live_test() else {
        warn!("IOTSIGN_TEST is not set, skipped");
        return Ok(());
    };

    let status = publish(&signer, &endpoint, r#"{"a":1}"#).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_publish_with_wrong_secret() -> Result<()> {
    let Some((signer, endpoint)) = init_live_test() else {
        warn!("IOTSIGN_TEST is not set, skipped");
        return Ok(());
    };

    let broken = Signer::new(
        signer.context().clone(),
        iotsign_aws_v4::StaticCredentialProvider::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY),
        iot_signer(),
    );
    let status = publish(&broken, &endpoint, r#"{"a":1}"#).await?;
    assert_eq!(StatusCode::FORBIDDEN, status);
    Ok(())
}

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

use anyhow::Result;
use iotsign_aws_v4::{Config, ConfigCredentialProvider, DefaultCredentialProvider, RequestSigner};
use iotsign_core::{Context, OsEnv, ProvideCredentialChain, Signer};
use iotsign_file_read_tokio::TokioFileRead;
use iotsign_http_send_reqwest::ReqwestHttpSend;
use iotsign_publisher::{Publisher, PublisherConfig, Scheduler, IOTSIGN_CONFIG_FILE};
use log::{error, info};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let settings = env::args()
        .nth(1)
        .or_else(|| ctx.env_var(IOTSIGN_CONFIG_FILE));

    let mut config = Config::default().from_env(&ctx);
    let mut publisher_config = PublisherConfig::default().from_env(&ctx)?;
    if let Some(path) = &settings {
        info!("loading settings from {path}");
        config = config.from_file(&ctx, path).await?;
        publisher_config = publisher_config.from_file(&ctx, path).await?;
    }
    info!("loaded config: {config:?}");

    let builder = RequestSigner::from_config(&config)?;
    let loader = ProvideCredentialChain::new()
        .push(ConfigCredentialProvider::new(Arc::new(config)))
        .push(DefaultCredentialProvider::new());
    let signer = Signer::new(ctx, loader, builder);

    let publisher = Publisher::new(
        signer,
        publisher_config.endpoint()?,
        publisher_config.content_type(),
    )?;
    let scheduler = Scheduler::new(publisher_config.interval()?)?;

    info!(
        "publishing to {} every {:?}",
        publisher.endpoint(),
        scheduler.interval()
    );
    let iterations = scheduler
        .run(|| publisher.publish_thermostat(), shutdown_signal())
        .await;
    info!("stopped after {iterations} publishes");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {err:?}");
        std::future::pending::<()>().await;
    }
}

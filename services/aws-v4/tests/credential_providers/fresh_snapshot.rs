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

use async_trait::async_trait;
use iotsign_aws_v4::{Credential, RequestSigner};
use iotsign_core::{Context, ProvideCredential, Result, Signer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hands out a new key on every call.
#[derive(Debug, Default)]
struct RotatingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProvideCredential for RotatingProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Credential::new(
            format!("AKID{n}"),
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
        )))
    }
}

fn parts() -> http::request::Parts {
    http::Request::post("https://example-ats.iot.us-east-1.amazonaws.com/topics/topic1")
        .body(())
        .unwrap()
        .into_parts()
        .0
}

#[tokio::test]
async fn test_every_sign_loads_a_new_credential() {
    let calls = Arc::new(AtomicUsize::new(0));
    let signer = Signer::new(
        Context::new(),
        RotatingProvider {
            calls: calls.clone(),
        },
        RequestSigner::new("iotdevicegateway", "us-east-1"),
    );

    for n in 0..3 {
        let mut req = parts();
        signer.sign(&mut req, b"{}").await.unwrap();

        let authorization = req.headers["authorization"].to_str().unwrap().to_string();
        assert!(
            authorization.contains(&format!("Credential=AKID{n}/")),
            "{authorization}"
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

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
use iotsign_core::ErrorKind;
use pretty_assertions::{assert_eq, assert_ne};
use std::sync::Arc;

const PAYLOAD: &[u8] = br#"{"ThermostatID":42,"SetPoint":70,"CurrentTemperature":68}"#;

fn sign(req: &SigningRequest, payload: &[u8]) -> iotsign_aws_v4::SigningOutput {
    iot_signer()
        .sign_at(req, payload, &credential(), test_time())
        .unwrap()
}

#[test]
fn test_signing_is_deterministic() {
    let req = iot_publish_request(&[("content-type", "application/json")]);

    let first = sign(&req, PAYLOAD);
    for _ in 0..8 {
        assert_eq!(sign(&req, PAYLOAD), first);
    }
}

#[test]
fn test_payload_change_changes_signature() {
    let req = iot_publish_request(&[("content-type", "application/json")]);
    let original = sign(&req, PAYLOAD);

    let mut tampered = PAYLOAD.to_vec();
    tampered[15] ^= 0x01;
    let tampered = sign(&req, &tampered);

    assert_ne!(original.x_amz_content_sha256, tampered.x_amz_content_sha256);
    assert_ne!(original.authorization, tampered.authorization);
}

#[test]
fn test_unsigned_header_does_not_change_signature() {
    let plain = iot_publish_request(&[("content-type", "application/json")]);
    let with_agent = iot_publish_request(&[
        ("content-type", "application/json"),
        ("user-agent", "thermostat/1.0"),
        ("x-amzn-trace-id", "Root=1-5759e988-bd862e3fe1be46a994272793"),
    ]);

    assert_eq!(sign(&plain, PAYLOAD), sign(&with_agent, PAYLOAD));
}

#[test]
fn test_signed_header_change_changes_signature() {
    let json = iot_publish_request(&[("content-type", "application/json")]);
    let text = iot_publish_request(&[("content-type", "text/plain")]);

    assert_ne!(
        sign(&json, PAYLOAD).authorization,
        sign(&text, PAYLOAD).authorization
    );
}

#[test]
fn test_header_name_case_does_not_matter() {
    let upper = iot_publish_request(&[("Content-Type", "application/json")]);
    let lower = iot_publish_request(&[("content-type", "application/json")]);

    assert_eq!(sign(&upper, PAYLOAD), sign(&lower, PAYLOAD));
}

#[test]
fn test_query_order_does_not_matter() {
    let a = signing_request(Method::POST, "https://example.com/topics/t?b=2&a=1", &[]);
    let b = signing_request(Method::POST, "https://example.com/topics/t?a=1&b=2", &[]);

    assert_eq!(sign(&a, PAYLOAD), sign(&b, PAYLOAD));
}

#[test]
fn test_time_change_changes_signature() {
    let req = iot_publish_request(&[]);
    let later = test_time() + chrono::TimeDelta::try_seconds(1).unwrap();

    let first = sign(&req, PAYLOAD);
    let second = iot_signer()
        .sign_at(&req, PAYLOAD, &credential(), later)
        .unwrap();
    assert_eq!(second.x_amz_date, "20150830T123601Z");
    assert_ne!(first.authorization, second.authorization);
}

#[test]
fn test_missing_host_is_rejected() {
    let req = signing_request(Method::POST, "/topics/topic1?qos=1", &[]);

    let err = iot_signer()
        .sign_at(&req, PAYLOAD, &credential(), test_time())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
}

#[test]
fn test_empty_credential_is_rejected() {
    let req = iot_publish_request(&[]);

    for cred in [
        Credential::new("", SECRET_ACCESS_KEY),
        Credential::new(ACCESS_KEY_ID, ""),
    ] {
        let err = iot_signer()
            .sign_at(&req, PAYLOAD, &cred, test_time())
            .unwrap_err();
        assert!(err.is_credential_error());
    }
}

#[tokio::test]
async fn test_concurrent_signing() {
    let signer = Arc::new(iot_signer());
    let expected = sign(&iot_publish_request(&[]), PAYLOAD);

    let handles = (0..16)
        .map(|_| {
            let signer = signer.clone();
            tokio::spawn(async move {
                let req = iot_publish_request(&[]);
                signer.sign_at(&req, PAYLOAD, &credential(), test_time())
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), expected);
    }
}

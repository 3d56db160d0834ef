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

//! Compare against the reference SigV4 implementation in `aws-sigv4`.

use super::*;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest, SigningSettings,
};
use aws_sigv4::sign::v4;
use http::header::AUTHORIZATION;
use http::Request;
use pretty_assertions::assert_eq;
use std::time::SystemTime;

/// (name, request_builder)
type TestCase = (&'static str, fn() -> Request<&'static str>);

fn test_cases() -> Vec<TestCase> {
    vec![
        ("iot_publish", test_iot_publish),
        ("iot_publish_with_length", test_iot_publish_with_length),
        ("get_request", test_get_request),
        ("get_request_with_query", test_get_request_with_query),
        ("get_request_with_port", test_get_request_with_port),
        ("shadow_update", test_shadow_update),
        ("shadow_update_escaped", test_shadow_update_escaped),
        ("topic_with_space", test_topic_with_space),
    ]
}

fn test_iot_publish() -> Request<&'static str> {
    Request::post(IOT_ENDPOINT)
        .header("content-type", "application/json")
        .body(r#"{"ThermostatID":42,"SetPoint":70,"CurrentTemperature":68}"#)
        .expect("request must be valid")
}

fn test_iot_publish_with_length() -> Request<&'static str> {
    let body = r#"{"ThermostatID":7,"SetPoint":90,"CurrentTemperature":33}"#;
    Request::post(IOT_ENDPOINT)
        .header("content-type", "application/json")
        .header("content-length", body.len().to_string())
        .body(body)
        .expect("request must be valid")
}

fn test_get_request() -> Request<&'static str> {
    Request::get("https://example.amazonaws.com/hello")
        .body("")
        .expect("request must be valid")
}

fn test_get_request_with_query() -> Request<&'static str> {
    Request::get(
        "https://example.amazonaws.com/hello?list-type=2&max-keys=3&prefix=CI/&start-after=ExampleGuide.pdf",
    )
    .body("")
    .expect("request must be valid")
}

fn test_get_request_with_port() -> Request<&'static str> {
    Request::get("http://127.0.0.1:9000/hello")
        .header("x-amz-meta-room", "kitchen")
        .body("")
        .expect("request must be valid")
}

fn test_shadow_update() -> Request<&'static str> {
    Request::post("https://a2p1hwvv77f23d-ats.iot.us-east-1.amazonaws.com/topics/$aws/things/t1/shadow/update")
        .header("content-type", "application/json")
        .body(r#"{"state":{"reported":{"SetPoint":70}}}"#)
        .expect("request must be valid")
}

fn test_shadow_update_escaped() -> Request<&'static str> {
    Request::post("https://a2p1hwvv77f23d-ats.iot.us-east-1.amazonaws.com/topics/%24aws/things/t1/shadow/update")
        .header("content-type", "application/json")
        .body(r#"{"state":{"reported":{"SetPoint":70}}}"#)
        .expect("request must be valid")
}

fn test_topic_with_space() -> Request<&'static str> {
    Request::post("https://a2p1hwvv77f23d-ats.iot.us-east-1.amazonaws.com/topics/my%20topic?qos=1")
        .header("content-type", "application/json")
        .body(r#"{"a":1}"#)
        .expect("request must be valid")
}

fn expected_authorization(req_fn: fn() -> Request<&'static str>, cred: &Credential) -> String {
    let mut req = req_fn();
    let mut ss = SigningSettings::default();
    ss.percent_encoding_mode = PercentEncodingMode::Double;
    ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;

    let id = Credentials::new(
        cred.access_key_id(),
        cred.secret_access_key(),
        cred.session_token().map(str::to_string),
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region("us-east-1")
        .name("iotdevicegateway")
        .time(SystemTime::from(test_time()))
        .settings(ss)
        .build()
        .expect("signing params must be valid");

    let output = aws_sigv4::http_request::sign(
        SignableRequest::new(
            req.method().as_str(),
            req.uri().to_string(),
            req.headers()
                .iter()
                .map(|(k, v)| (k.as_str(), std::str::from_utf8(v.as_bytes()).unwrap())),
            SignableBody::Bytes(req.body().as_bytes()),
        )
        .expect("signable request must be valid"),
        &sp.into(),
    )
    .expect("aws-sigv4 must sign");

    let (instructions, _) = output.into_parts();
    instructions.apply_to_request_http1x(&mut req);
    req.headers()[AUTHORIZATION]
        .to_str()
        .expect("authorization must be valid")
        .to_string()
}

fn actual_authorization(req: &Request<&'static str>, cred: &Credential) -> String {
    let signing_req = SigningRequest::new(
        req.method().clone(),
        req.uri().clone(),
        req.headers().clone(),
    );

    iot_signer()
        .sign_at(&signing_req, req.body().as_bytes(), cred, test_time())
        .expect("sign must succeed")
        .authorization
}

#[test]
fn test_matches_aws_sigv4() {
    let _ = env_logger::builder().is_test(true).try_init();

    for (name, req_fn) in test_cases() {
        let req = req_fn();
        let cred = credential();

        assert_eq!(
            actual_authorization(&req, &cred),
            expected_authorization(req_fn, &cred),
            "{name} authorization mismatch"
        );
    }
}

#[test]
fn test_matches_aws_sigv4_with_session_token() {
    let _ = env_logger::builder().is_test(true).try_init();

    for (name, req_fn) in test_cases() {
        let req = req_fn();
        let cred = credential().with_session_token("security_token");

        assert_eq!(
            actual_authorization(&req, &cred),
            expected_authorization(req_fn, &cred),
            "{name} authorization mismatch"
        );
    }
}

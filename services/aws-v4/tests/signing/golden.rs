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
use http::header::{AUTHORIZATION, HOST};
use iotsign_aws_v4::StaticCredentialProvider;
use iotsign_core::{Context, Signer};
use pretty_assertions::assert_eq;

const PAYLOAD: &[u8] = br#"{"a":1}"#;
const PAYLOAD_SHA256: &str = "015abd7f5cc57a2dd94b7590f04ad8084273905ee33ec5cebeae62276a97f862";

#[test]
fn test_iot_publish_vector() {
    let req = iot_publish_request(&[("content-type", "application/json")]);
    let output = iot_signer()
        .sign_at(&req, PAYLOAD, &credential(), test_time())
        .unwrap();

    assert_eq!(
        output.authorization,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iotdevicegateway/aws4_request, \
         SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date, \
         Signature=d2a837dc2861ec147bfe9df0c939963997f052bcbadbb95b70081cab76b9c615"
    );
    assert_eq!(output.x_amz_date, "20150830T123600Z");
    assert_eq!(output.x_amz_content_sha256, PAYLOAD_SHA256);
}

#[test]
fn test_iot_publish_vector_with_session_token() {
    let req = iot_publish_request(&[("content-type", "application/json")]);
    let cred = credential().with_session_token("session-token");
    let output = iot_signer()
        .sign_at(&req, PAYLOAD, &cred, test_time())
        .unwrap();

    assert_eq!(
        output.authorization,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iotdevicegateway/aws4_request, \
         SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date;x-amz-security-token, \
         Signature=79386f4caec502ab0a3b03e2d28de15ae798d073c3a9f6dbd008891659449f41"
    );
    assert_eq!(output.x_amz_security_token.as_deref(), Some("session-token"));
}

#[test]
fn test_explicit_host_header_matches_authority() {
    let implicit = iot_publish_request(&[("content-type", "application/json")]);
    let explicit = iot_publish_request(&[
        ("content-type", "application/json"),
        ("host", "a2p1hwvv77f23d-ats.iot.us-east-1.amazonaws.com"),
    ]);

    let signer = iot_signer();
    let implicit = signer
        .sign_at(&implicit, PAYLOAD, &credential(), test_time())
        .unwrap();
    let explicit = signer
        .sign_at(&explicit, PAYLOAD, &credential(), test_time())
        .unwrap();
    assert_eq!(implicit, explicit);
}

#[test]
fn test_empty_get_vector() {
    let req = signing_request(Method::GET, "https://example.amazonaws.com/", &[]);
    let output = RequestSigner::new("service", "us-east-1")
        .with_time(test_time())
        .sign(&req, b"", &credential())
        .unwrap();

    assert_eq!(
        output.authorization,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
         Signature=b0e9826b8e27230263689c913533611258ba50a1cf46f2c0ae5eea5c777359c2"
    );
    assert_eq!(
        output.x_amz_content_sha256,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[tokio::test]
async fn test_signer_writes_headers_back() {
    let _ = env_logger::builder().is_test(true).try_init();

    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY),
        iot_signer().with_time(test_time()),
    );

    let mut parts = http::Request::post(IOT_ENDPOINT)
        .header("content-type", "application/json")
        .body(())
        .unwrap()
        .into_parts()
        .0;
    signer.sign(&mut parts, PAYLOAD).await.unwrap();

    assert_eq!(parts.uri, IOT_ENDPOINT);
    assert_eq!(
        parts.headers[HOST],
        "a2p1hwvv77f23d-ats.iot.us-east-1.amazonaws.com"
    );
    assert_eq!(parts.headers["x-amz-date"], "20150830T123600Z");
    assert_eq!(parts.headers["x-amz-content-sha256"], PAYLOAD_SHA256);
    assert!(parts.headers[AUTHORIZATION].is_sensitive());
    assert!(parts.headers[AUTHORIZATION]
        .to_str()
        .unwrap()
        .ends_with("Signature=d2a837dc2861ec147bfe9df0c939963997f052bcbadbb95b70081cab76b9c615"));
}

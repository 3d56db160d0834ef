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

mod cross_check;
mod golden;
mod live;
mod properties;

use chrono::{TimeZone, Utc};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use iotsign_aws_v4::{Credential, RequestSigner};
use iotsign_core::time::DateTime;
use iotsign_core::SigningRequest;

pub const ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
pub const SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";
pub const IOT_ENDPOINT: &str =
    "https://a2p1hwvv77f23d-ats.iot.us-east-1.amazonaws.com/topics/topic1?qos=1";

/// 2015-08-30T12:36:00Z, the clock reading used by every known vector.
pub fn test_time() -> DateTime {
    Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
}

pub fn credential() -> Credential {
    Credential::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY)
}

pub fn iot_signer() -> RequestSigner {
    RequestSigner::new("iotdevicegateway", "us-east-1")
}

pub fn signing_request(method: Method, uri: &str, headers: &[(&str, &str)]) -> SigningRequest {
    let mut map = HeaderMap::new();
    for (k, v) in headers {
        map.append(
            HeaderName::from_bytes(k.as_bytes()).unwrap(),
            HeaderValue::from_str(v).unwrap(),
        );
    }

    SigningRequest::new(method, uri.parse().unwrap(), map)
}

pub fn iot_publish_request(headers: &[(&str, &str)]) -> SigningRequest {
    signing_request(Method::POST, IOT_ENDPOINT, headers)
}

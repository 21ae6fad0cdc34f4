//! Integration tests for the silo server.
//!
//! These tests drive a running silo instance through the official AWS SDK,
//! so they exercise real SigV4 signing, path-style addressing, and the wire
//! XML. They require a server at `localhost:9000` and are marked `#[ignore]`
//! so they don't run during normal `cargo test`.
//!
//! Start a server and run them with:
//! ```text
//! DATA_DIR=$(mktemp -d) CREDENTIALS=siloadmin:siloadmin silo-server &
//! cargo test -p silo-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server under test.
fn endpoint_url() -> String {
    std::env::var("SILO_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:9000".to_owned())
}

/// Create an S3 client pointing at the local server.
///
/// Credentials default to `siloadmin`/`siloadmin`, matching the
/// `CREDENTIALS=siloadmin:siloadmin` server setup in the crate docs.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let access_key =
        std::env::var("SILO_TEST_ACCESS_KEY").unwrap_or_else(|_| "siloadmin".to_owned());
    let secret_key =
        std::env::var("SILO_TEST_SECRET_KEY").unwrap_or_else(|_| "siloadmin".to_owned());
    let creds = Credentials::new(access_key, secret_key, None, None, "silo-integration");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .force_path_style(true)
        // Plain signed bodies; silo does not decode aws-chunked trailers.
        .request_checksum_calculation(
            aws_sdk_s3::config::RequestChecksumCalculation::WhenRequired,
        )
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Generate a unique bucket name for a test. Buckets are implicit in silo,
/// so no creation step is needed.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Delete every object in a bucket.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    if let Ok(listing) = client.list_objects_v2().bucket(bucket).send().await {
        for object in listing.contents() {
            if let Some(key) = object.key() {
                let _ = client.delete_object().bucket(bucket).key(key).send().await;
            }
        }
    }
}

mod test_error;
mod test_multipart;
mod test_object;
mod test_range;

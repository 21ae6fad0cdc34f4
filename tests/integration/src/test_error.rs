//! Error-path integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_s3::primitives::ByteStream;
    use aws_sdk_s3::types::{Delete, ObjectIdentifier};

    use crate::{cleanup_bucket, s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_no_such_key() {
        let client = s3_client();
        let bucket = test_bucket_name("missing");

        let err = client
            .get_object()
            .bucket(&bucket)
            .key("never-existed.txt")
            .send()
            .await
            .expect_err("object does not exist");
        assert!(err.into_service_error().is_no_such_key());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_bucket_name() {
        let client = s3_client();

        let err = client
            .get_object()
            .bucket("ab")
            .key("key.txt")
            .send()
            .await
            .expect_err("bucket name is too short");
        assert_eq!(
            err.into_service_error().meta().code(),
            Some("InvalidBucketName")
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_wrong_secret_key() {
        let creds = Credentials::new("siloadmin", "wrong-secret", None, None, "bad-creds");
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(creds)
            .endpoint_url(
                std::env::var("SILO_ENDPOINT_URL")
                    .unwrap_or_else(|_| "http://localhost:9000".to_owned()),
            )
            .force_path_style(true)
            .build();
        let client = aws_sdk_s3::Client::from_conf(config);

        let err = client
            .get_object()
            .bucket("anybucket")
            .key("any.txt")
            .send()
            .await
            .expect_err("signature cannot match");
        assert_eq!(
            err.into_service_error().meta().code(),
            Some("SignatureDoesNotMatch")
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_bulk_delete_with_mixed_results() {
        let client = s3_client();
        let bucket = test_bucket_name("bulk");

        for key in ["one.txt", "two.txt"] {
            client
                .put_object()
                .bucket(&bucket)
                .key(key)
                .body(ByteStream::from_static(b"x"))
                .send()
                .await
                .expect("put_object");
        }

        let delete = Delete::builder()
            .objects(ObjectIdentifier::builder().key("one.txt").build().unwrap())
            .objects(ObjectIdentifier::builder().key("two.txt").build().unwrap())
            .objects(
                ObjectIdentifier::builder()
                    .key("never-existed.txt")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let resp = client
            .delete_objects()
            .bucket(&bucket)
            .delete(delete)
            .send()
            .await
            .expect("delete_objects");

        let deleted: Vec<&str> = resp.deleted().iter().filter_map(|d| d.key()).collect();
        assert!(deleted.contains(&"one.txt"));
        assert!(deleted.contains(&"two.txt"));
        // Absent objects delete successfully under S3 semantics.
        assert!(deleted.contains(&"never-existed.txt"));
        assert!(resp.errors().is_empty());

        let listing = client
            .list_objects_v2()
            .bucket(&bucket)
            .send()
            .await
            .expect("list");
        assert!(listing.contents().is_empty());

        cleanup_bucket(&client, &bucket).await;
    }
}

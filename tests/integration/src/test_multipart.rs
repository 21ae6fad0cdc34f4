//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;
    use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};

    use crate::{cleanup_bucket, s3_client, test_bucket_name};

    /// Start an upload and return its id.
    async fn initiate(client: &aws_sdk_s3::Client, bucket: &str, key: &str) -> String {
        client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .expect("create_multipart_upload")
            .upload_id()
            .expect("upload_id")
            .to_owned()
    }

    /// Upload one part and return its ETag.
    async fn upload_part(
        client: &aws_sdk_s3::Client,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> String {
        client
            .upload_part()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::from(body))
            .send()
            .await
            .unwrap_or_else(|e| panic!("upload part {part_number}: {e}"))
            .e_tag()
            .expect("part etag")
            .to_owned()
    }

    /// Complete an upload with consecutive part numbers `1..=parts`.
    async fn complete(
        client: &aws_sdk_s3::Client,
        bucket: &str,
        key: &str,
        upload_id: &str,
        etags: &[String],
    ) {
        let mut completed = CompletedMultipartUpload::builder();
        for (index, etag) in etags.iter().enumerate() {
            completed = completed.parts(
                CompletedPart::builder()
                    .part_number(index as i32 + 1)
                    .e_tag(etag)
                    .build(),
            );
        }

        client
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed.build())
            .send()
            .await
            .expect("complete_multipart_upload");
    }

    async fn object_bytes(client: &aws_sdk_s3::Client, bucket: &str, key: &str) -> Vec<u8> {
        client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .expect("get_object")
            .body
            .collect()
            .await
            .expect("collect body")
            .into_bytes()
            .to_vec()
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_assemble_parts_in_order() {
        let client = s3_client();
        let bucket = test_bucket_name("mpu");
        let key = "assembled.bin";

        let upload_id = initiate(&client, &bucket, key).await;
        // Upload out of order; assembly follows part numbers.
        let etag2 = upload_part(&client, &bucket, key, &upload_id, 2, b"world".to_vec()).await;
        let etag1 = upload_part(&client, &bucket, key, &upload_id, 1, b"hello ".to_vec()).await;
        complete(&client, &bucket, key, &upload_id, &[etag1, etag2]).await;

        assert_eq!(object_bytes(&client, &bucket, key).await, b"hello world");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_isolate_concurrent_sessions_on_same_key() {
        let client = s3_client();
        let bucket = test_bucket_name("isolation");
        let key = "concurrent.bin";

        let session_a = initiate(&client, &bucket, key).await;
        let session_b = initiate(&client, &bucket, key).await;
        assert_ne!(session_a, session_b);

        let a1 = upload_part(&client, &bucket, key, &session_a, 1, b"A1".to_vec()).await;
        let b1 = upload_part(&client, &bucket, key, &session_b, 1, b"B1".to_vec()).await;

        complete(&client, &bucket, key, &session_a, &[a1]).await;
        assert_eq!(object_bytes(&client, &bucket, key).await, b"A1");

        // Session B is still alive and completable after A's completion.
        let b2 = upload_part(&client, &bucket, key, &session_b, 2, b"B2".to_vec()).await;
        complete(&client, &bucket, key, &session_b, &[b1, b2]).await;
        assert_eq!(object_bytes(&client, &bucket, key).await, b"B1B2");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_abort_upload() {
        let client = s3_client();
        let bucket = test_bucket_name("abort");
        let key = "aborted.bin";

        let upload_id = initiate(&client, &bucket, key).await;
        upload_part(&client, &bucket, key, &upload_id, 1, b"discard".to_vec()).await;

        client
            .abort_multipart_upload()
            .bucket(&bucket)
            .key(key)
            .upload_id(&upload_id)
            .send()
            .await
            .expect("abort_multipart_upload");

        // The aborted session is gone.
        let err = client
            .upload_part()
            .bucket(&bucket)
            .key(key)
            .upload_id(&upload_id)
            .part_number(2)
            .body(ByteStream::from_static(b"late"))
            .send()
            .await
            .expect_err("session is gone");
        assert_eq!(
            err.into_service_error().meta().code(),
            Some("NoSuchUpload")
        );

        // No object was ever created.
        let err = client
            .get_object()
            .bucket(&bucket)
            .key(key)
            .send()
            .await
            .expect_err("no object");
        assert!(err.into_service_error().is_no_such_key());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_complete_with_unknown_upload_id() {
        let client = s3_client();
        let bucket = test_bucket_name("badid");

        let err = client
            .complete_multipart_upload()
            .bucket(&bucket)
            .key("nothing.bin")
            .upload_id("deadbeefdeadbeefdeadbeefdeadbeef")
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .parts(CompletedPart::builder().part_number(1).e_tag("x").build())
                    .build(),
            )
            .send()
            .await
            .expect_err("unknown upload id");
        assert_eq!(
            err.into_service_error().meta().code(),
            Some("NoSuchUpload")
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_complete_referencing_missing_part() {
        let client = s3_client();
        let bucket = test_bucket_name("gap");
        let key = "gap.bin";

        let upload_id = initiate(&client, &bucket, key).await;
        let etag1 = upload_part(&client, &bucket, key, &upload_id, 1, b"only".to_vec()).await;

        let completed = CompletedMultipartUpload::builder()
            .parts(CompletedPart::builder().part_number(1).e_tag(&etag1).build())
            .parts(CompletedPart::builder().part_number(2).e_tag("ghost").build())
            .build();
        let err = client
            .complete_multipart_upload()
            .bucket(&bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .expect_err("part 2 missing");
        assert_eq!(err.into_service_error().meta().code(), Some("InvalidPart"));

        // The session survives the failed completion; finish it properly.
        let etag2 = upload_part(&client, &bucket, key, &upload_id, 2, b"-done".to_vec()).await;
        complete(&client, &bucket, key, &upload_id, &[etag1, etag2]).await;
        assert_eq!(object_bytes(&client, &bucket, key).await, b"only-done");

        cleanup_bucket(&client, &bucket).await;
    }
}

//! Object CRUD integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{cleanup_bucket, s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_and_get_object() {
        let client = s3_client();
        let bucket = test_bucket_name("putget");

        let body = b"hello integration test\n";
        let put = client
            .put_object()
            .bucket(&bucket)
            .key("hello.txt")
            .body(ByteStream::from_static(body))
            .send()
            .await
            .expect("put_object");
        assert!(put.e_tag().is_some(), "PUT returns an ETag");

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("hello.txt")
            .send()
            .await
            .expect("get_object");
        assert_eq!(resp.content_length(), Some(body.len() as i64));

        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), body);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_overwrite_object() {
        let client = s3_client();
        let bucket = test_bucket_name("overwrite");

        for body in [&b"first"[..], &b"second version"[..]] {
            client
                .put_object()
                .bucket(&bucket)
                .key("versioned.txt")
                .body(ByteStream::from(body.to_vec()))
                .send()
                .await
                .expect("put_object");
        }

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("versioned.txt")
            .send()
            .await
            .expect("get_object");
        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), b"second version");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_head_object() {
        let client = s3_client();
        let bucket = test_bucket_name("head");

        client
            .put_object()
            .bucket(&bucket)
            .key("file.bin")
            .body(ByteStream::from_static(b"binary data"))
            .send()
            .await
            .expect("put_object");

        let resp = client
            .head_object()
            .bucket(&bucket)
            .key("file.bin")
            .send()
            .await
            .expect("head_object");
        assert_eq!(resp.content_length(), Some(11));
        assert!(resp.last_modified().is_some());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_object_idempotently() {
        let client = s3_client();
        let bucket = test_bucket_name("del");

        client
            .put_object()
            .bucket(&bucket)
            .key("gone.txt")
            .body(ByteStream::from_static(b"x"))
            .send()
            .await
            .expect("put_object");

        client
            .delete_object()
            .bucket(&bucket)
            .key("gone.txt")
            .send()
            .await
            .expect("delete_object");

        // Deleting the now-absent object still succeeds.
        client
            .delete_object()
            .bucket(&bucket)
            .key("gone.txt")
            .send()
            .await
            .expect("delete_object is idempotent");

        let err = client
            .get_object()
            .bucket(&bucket)
            .key("gone.txt")
            .send()
            .await
            .expect_err("object is gone");
        assert!(err.into_service_error().is_no_such_key());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_store_nested_keys() {
        let client = s3_client();
        let bucket = test_bucket_name("nested");

        client
            .put_object()
            .bucket(&bucket)
            .key("a/b/c/deep.txt")
            .body(ByteStream::from_static(b"deep"))
            .send()
            .await
            .expect("put_object");

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("a/b/c/deep.txt")
            .send()
            .await
            .expect("get_object");
        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), b"deep");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_empty_object() {
        let client = s3_client();
        let bucket = test_bucket_name("empty");

        client
            .put_object()
            .bucket(&bucket)
            .key("zero.bin")
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .expect("put_object");

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("zero.bin")
            .send()
            .await
            .expect("get_object");
        assert_eq!(resp.content_length(), Some(0));
        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert!(data.is_empty());

        cleanup_bucket(&client, &bucket).await;
    }
}

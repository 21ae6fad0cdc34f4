//! Range request integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{cleanup_bucket, s3_client, test_bucket_name};

    /// 17 bytes, matching the documented range examples.
    const CONTENT: &[u8] = b"part-one-part-two";

    async fn put_content(client: &aws_sdk_s3::Client, bucket: &str) {
        client
            .put_object()
            .bucket(bucket)
            .key("multi.bin")
            .body(ByteStream::from_static(CONTENT))
            .send()
            .await
            .expect("put_object");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_bounded_range() {
        let client = s3_client();
        let bucket = test_bucket_name("range");
        put_content(&client, &bucket).await;

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("multi.bin")
            .range("bytes=0-3")
            .send()
            .await
            .expect("ranged get");
        assert_eq!(resp.content_length(), Some(4));
        assert_eq!(resp.content_range(), Some("bytes 0-3/17"));
        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), b"part");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_suffix_range() {
        let client = s3_client();
        let bucket = test_bucket_name("suffix");
        put_content(&client, &bucket).await;

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("multi.bin")
            .range("bytes=-5")
            .send()
            .await
            .expect("suffix get");
        assert_eq!(resp.content_range(), Some("bytes 12-16/17"));
        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), b"t-two");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_range_past_the_end() {
        let client = s3_client();
        let bucket = test_bucket_name("badrange");
        put_content(&client, &bucket).await;

        let err = client
            .get_object()
            .bucket(&bucket)
            .key("multi.bin")
            .range("bytes=99999-100000")
            .send()
            .await
            .expect_err("range is unsatisfiable");
        let raw = err.raw_response().expect("http response");
        assert_eq!(raw.status().as_u16(), 416);

        cleanup_bucket(&client, &bucket).await;
    }
}

use anyhow::Context;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use super::repo;
use crate::state::AppState;
use crate::storage::photo_key;

/// Presigned links stay valid for ten minutes.
pub const PHOTO_URL_TTL_SECS: u64 = 10 * 60;

/// Uploads a meal photo and records it. The object is removed again if the
/// row cannot be written.
pub async fn store_photo(
    st: &AppState,
    user_id: Uuid,
    body: Bytes,
    content_type: &str,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let key = photo_key(user_id, id, content_type);
    st.storage
        .put_object(&key, body, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;

    if let Err(e) = repo::insert_photo(&st.db, id, user_id, &key, content_type).await {
        if let Err(cleanup) = st.storage.delete_object(&key).await {
            warn!(error = %cleanup, %key, "orphaned photo object");
        }
        return Err(e);
    }
    Ok(id)
}

pub async fn presign_photo(st: &AppState, s3_key: &str) -> anyhow::Result<String> {
    st.storage
        .presign_get(s3_key, PHOTO_URL_TTL_SECS)
        .await
        .with_context(|| format!("presign url for {}", s3_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing;

    #[tokio::test]
    async fn presign_goes_through_storage() {
        let state = testing::fake();
        let url = presign_photo(&state, "photos/a/b.jpg").await.unwrap();
        assert_eq!(url, "https://fake.local/photos/a/b.jpg");
    }
}

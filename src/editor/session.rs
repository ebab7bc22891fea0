//! A profile editor bound to one brand and the profile endpoint.

use console_common::BrandId;

use super::{ProfileEditor, tabs};
use crate::errors::{DocumentError, EditorError};
use crate::gateway::RequestGateway;
use crate::mount::Mounted;
use crate::profile::ProfileGateway;

/// Owns the editor for one brand while its view is open.
///
/// Loads and saves are not cancelled by `close`; their completions find the
/// editor unmounted and are dropped.
pub struct ProfileSession<G> {
    brand_id: BrandId,
    gateway: ProfileGateway<G>,
    editor: Mounted<ProfileEditor>,
}

impl<G: RequestGateway> ProfileSession<G> {
    pub fn new(brand_id: BrandId, gateway: G) -> Self {
        Self::with_editor(brand_id, gateway, ProfileEditor::new())
    }

    pub fn with_editor(brand_id: BrandId, gateway: G, editor: ProfileEditor) -> Self {
        Self {
            brand_id,
            gateway: ProfileGateway::new(gateway),
            editor: Mounted::new(editor),
        }
    }

    pub fn brand_id(&self) -> BrandId {
        self.brand_id
    }

    /// Shared handle to the editor state.
    pub fn editor(&self) -> Mounted<ProfileEditor> {
        self.editor.clone()
    }

    /// Run `f` against the editor; `Detached` once closed.
    pub fn edit<R>(&self, f: impl FnOnce(&mut ProfileEditor) -> R) -> Result<R, EditorError> {
        self.editor.with(f).ok_or(EditorError::Detached)
    }

    /// Fetch the stored profile and replace the editor contents with it.
    pub async fn load(&self) -> Result<(), EditorError> {
        let snapshot = self.gateway.load(self.brand_id).await?;
        self.editor
            .with(|editor| editor.load(snapshot))
            .ok_or_else(|| self.detached("load"))
    }

    /// Save the active view's document and adopt the stored result.
    ///
    /// Validation failures return before any request; gateway failures leave
    /// the editor exactly as it was.
    pub async fn save(&self) -> Result<(), EditorError> {
        let payload = self
            .editor
            .read(|editor| editor.prepare_save())
            .ok_or(EditorError::Detached)??;
        let stored = self.gateway.save(self.brand_id, &payload).await?;
        self.editor
            .with(|editor| editor.commit_saved(stored))
            .ok_or_else(|| self.detached("save"))
    }

    /// Save one backend section and adopt its stored form.
    ///
    /// Only the section's top-level keys are replaced locally, so unsaved
    /// edits elsewhere survive. Pending raw edits block the save.
    pub async fn save_section(&self, section_id: &str) -> Result<(), EditorError> {
        let section = tabs::section(section_id)
            .ok_or_else(|| DocumentError::UnknownSection(section_id.to_string()))?;
        let document = self
            .editor
            .read(|editor| editor.prepare_section_save())
            .ok_or(EditorError::Detached)??;
        let stored = self
            .gateway
            .save_section(self.brand_id, section, &document)
            .await?;
        self.editor
            .with(|editor| editor.commit_section(section, &stored))
            .ok_or_else(|| self.detached("save_section"))
    }

    /// Tear down the view. Later completions are ignored.
    pub fn close(&self) {
        self.editor.unmount();
    }

    fn detached(&self, operation: &str) -> EditorError {
        tracing::debug!(
            brand_id = self.brand_id,
            operation,
            "profile completion arrived after close; ignored"
        );
        EditorError::Detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::View;
    use crate::errors::GatewayError;
    use crate::gateway::Method;
    use crate::gateway::mock::MockGateway;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const PATH: &str = "/admin/api/brands/3/ai-config";

    fn loaded_session(config: serde_json::Value) -> ProfileSession<Arc<MockGateway>> {
        let mock = Arc::new(MockGateway::new());
        mock.expect(
            Method::Get,
            PATH,
            Ok(json!({"category": "food", "config": config})),
        );
        ProfileSession::new(3, mock)
    }

    #[tokio::test]
    async fn test_load_then_structured_save_keeps_unknown_keys() {
        let session = loaded_session(json!({"custom_block": {"x": [1, 2]}, "language": "en"}));
        session.load().await.unwrap();
        session
            .edit(|editor| editor.set_field("brand_voice", "warm and direct"))
            .unwrap()
            .unwrap();

        let mock = Arc::clone(session.gateway.gateway());
        mock.expect(
            Method::Put,
            PATH,
            Ok(json!({"ok": true, "config": {"custom_block": {"x": [1, 2]}, "language": "en", "brand_voice": "warm and direct"}})),
        );
        session.save().await.unwrap();

        let put = mock.calls().into_iter().find(|c| c.method == Method::Put).unwrap();
        let sent = put.body.unwrap();
        assert_eq!(sent["config"]["custom_block"], json!({"x": [1, 2]}));
        assert_eq!(sent["config"]["brand_voice"], json!("warm and direct"));
    }

    #[tokio::test]
    async fn test_raw_save_with_bad_text_makes_no_request() {
        let session = loaded_session(json!({"language": "en"}));
        session.load().await.unwrap();
        session.edit(|editor| editor.edit_raw("{oops")).unwrap();

        let err = session.save().await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.gateway.gateway().call_count(), 1);
        let document = session.edit(|editor| editor.document().to_value()).unwrap();
        assert_eq!(document, json!({"language": "en"}));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_editor_untouched() {
        let session = loaded_session(json!({"language": "en"}));
        session.load().await.unwrap();
        session.edit(|editor| editor.edit_raw("{\"language\": \"de\"}")).unwrap();
        session.gateway.gateway().expect(
            Method::Put,
            PATH,
            Err(GatewayError::new("Invalid JSON document: Expecting value", Some(400))),
        );

        let err = session.save().await.unwrap_err();
        assert_eq!(err.user_message(), crate::errors::RAW_SYNTAX_HINT);
        session
            .edit(|editor| {
                assert_eq!(editor.view(), View::Raw);
                assert!(editor.has_pending_raw_edits());
                assert_eq!(editor.document().to_value(), json!({"language": "en"}));
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_section_save_keeps_other_local_edits() {
        let session = loaded_session(json!({"language": "en", "hashtags": {"niche": []}}));
        session.load().await.unwrap();
        session
            .edit(|editor| {
                editor.set_field("hashtags_niche", "#handloom, #saree")?;
                editor.set_field("brand_voice", "unsaved")
            })
            .unwrap()
            .unwrap();

        let mock = Arc::clone(session.gateway.gateway());
        mock.expect(
            Method::Patch,
            "/admin/api/brands/3/ai-config/hashtags",
            Ok(json!({"ok": true, "section": "hashtags"})),
        );
        mock.expect(
            Method::Get,
            PATH,
            Ok(json!({"config": {"language": "en", "hashtags": {"niche": ["#handloom", "#saree"], "craft": []}}})),
        );
        session.save_section("hashtags").await.unwrap();

        let patch = mock.calls().into_iter().find(|c| c.method == Method::Patch).unwrap();
        assert_eq!(
            patch.body,
            Some(json!({"hashtags": {"niche": ["#handloom", "#saree"]}}))
        );
        let document = session.edit(|editor| editor.document().to_value()).unwrap();
        assert_eq!(document["hashtags"]["craft"], json!([]));
        assert_eq!(document["brand_voice"], json!("unsaved"));
    }

    #[tokio::test]
    async fn test_section_save_rejects_unknown_section_and_pending_raw() {
        let session = loaded_session(json!({"language": "en"}));
        session.load().await.unwrap();

        let err = session.save_section("tagline").await.unwrap_err();
        assert!(matches!(
            err,
            EditorError::Document(DocumentError::UnknownSection(_))
        ));

        session.edit(|editor| editor.edit_raw("{}")).unwrap();
        let err = session.save_section("basics").await.unwrap_err();
        assert!(matches!(err, EditorError::PendingRawEdits));
        assert_eq!(session.gateway.gateway().call_count(), 1);
    }

    #[tokio::test]
    async fn test_completion_after_close_is_ignored() {
        let editor_slot: Arc<Mutex<Option<Mounted<ProfileEditor>>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&editor_slot);
        // Closing the view while the GET is in flight.
        let mock = MockGateway::new().with_hook(move |_| {
            if let Some(editor) = slot.lock().unwrap().as_ref() {
                editor.unmount();
            }
        });
        mock.expect(Method::Get, PATH, Ok(json!({"config": {"language": "en"}})));
        let session = ProfileSession::new(3, mock);
        *editor_slot.lock().unwrap() = Some(session.editor());

        let err = session.load().await.unwrap_err();
        assert!(matches!(err, EditorError::Detached));
        assert!(!session.editor().is_mounted());
    }

    #[tokio::test]
    async fn test_edit_after_close_is_detached() {
        let session = ProfileSession::new(3, MockGateway::new());
        session.close();
        assert!(matches!(
            session.edit(|editor| editor.discard_raw_edits()),
            Err(EditorError::Detached)
        ));
    }
}

// ============================================================================
// ATTACHMENTS VIEWMODEL - Lista de adjuntos + upload multipart
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::models::{Attachment, FileUpload};
use crate::state::NotificationSeverity;
use crate::viewmodels::list_resource::{ListResource, ListScope};
use crate::viewmodels::page_context::PageContext;

#[derive(Clone)]
pub struct AttachmentsViewModel {
    ctx: PageContext,
    project_id: String,
    list: ListResource<Attachment>,
    uploading: Rc<Cell<bool>>,
}

impl AttachmentsViewModel {
    pub fn new(ctx: PageContext, project_id: &str) -> Self {
        let list = ListResource::new(ctx.clone(), ListScope::for_project(project_id));
        Self {
            ctx,
            project_id: project_id.to_string(),
            list,
            uploading: Rc::new(Cell::new(false)),
        }
    }

    pub fn list(&self) -> &ListResource<Attachment> {
        &self.list
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.get()
    }

    /// URL absoluta para descargar un adjunto
    pub fn download_url(&self, attachment: &Attachment) -> String {
        self.ctx.config.file_url(&attachment.file_url)
    }

    /// Sube el archivo y vuelve a pedir la lista
    pub async fn upload(&self, file: FileUpload) -> bool {
        if self.uploading.replace(true) {
            return false;
        }
        let result = self.ctx.api.upload(&self.project_id, file).await;
        self.uploading.set(false);

        match result {
            Ok(_) => {
                self.list.fetch().await;
                self.ctx.notify("uploaded_ok", NotificationSeverity::Success);
                true
            }
            Err(error) => {
                self.ctx.report_failure(&error, "upload_failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, RecordingTransport};
    use futures::executor::block_on;
    use serde_json::json;

    fn file() -> FileUpload {
        FileUpload {
            file_name: "report.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn successful_upload_refetches_the_list() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "id": "att-1" }));
        transport.push_json(200, json!({ "data": { "attachmentsByProjectId": { "nodes": [
            { "id": "att-1", "fileName": "report.pdf", "fileSize": 3, "fileUrl": "/files/report.pdf" }
        ] } } }));
        let vm = AttachmentsViewModel::new(test_context(Rc::new(transport.clone())), "p1");

        assert!(block_on(vm.upload(file())));

        let rows = vm.list().state().data().cloned().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(vm.download_url(&rows[0]), "http://api/files/report.pdf");
        assert_eq!(transport.requests()[0].url, "http://api/api/upload");
        assert_eq!(transport.operation_names(), vec!["Attachments"]);
        assert_eq!(vm.ctx.notifications.current().unwrap().message, "Успешно загружено");
    }

    #[test]
    fn failed_upload_leaves_the_list_alone() {
        let transport = RecordingTransport::new();
        transport.push_json(500, json!({ "error": "disk full" }));
        let vm = AttachmentsViewModel::new(test_context(Rc::new(transport.clone())), "p1");

        assert!(!block_on(vm.upload(file())));

        assert_eq!(transport.requests().len(), 1);
        assert!(!vm.is_uploading());
        assert_eq!(vm.ctx.notifications.current().unwrap().message, "Ошибка при загрузке");
    }
}

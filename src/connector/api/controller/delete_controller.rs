use anyhow::Result;

use crate::DeletionReport;

use super::super::Container;

pub struct DeleteController<'a> {
    container: &'a Container,
}

impl<'a> DeleteController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn delete(&self, source: String) -> Result<String> {
        let use_case = self.container.delete_use_case();
        let report = use_case.execute(&source).await?;

        Ok(self.format_delete_success(&report))
    }

    fn format_delete_success(&self, report: &DeletionReport) -> String {
        format!(
            "Removed {} chunks for source '{}' ({} remaining).",
            report.removed, report.source, report.remaining
        )
    }
}

use crate::configuration::constants::defaults;

/// Optional run metadata used to enrich the report with links
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct RunContext {
    #[builder(default = "defaults::REPORT_TITLE.to_owned()")]
    pub title: String,
    #[builder(default = "defaults::SERVER_URL.to_owned()")]
    pub server_url: String,
    /// `owner/name`
    #[builder(default)]
    pub repository: Option<String>,
    #[builder(default)]
    pub run_id: Option<String>,
    #[builder(default = "defaults::PAGES_HOST.to_owned()")]
    pub pages_host: String,
    #[builder(default)]
    pub sent_at: Option<String>,
}

impl RunContext {
    pub fn builder() -> RunContextBuilder {
        RunContextBuilder::default()
    }

    /// `<server>/<owner>/<name>/actions/runs/<run_id>`, only when a run id is known
    pub fn run_url(&self) -> Option<String> {
        let run_id = self.run_id.as_deref()?;
        let mut segments = vec![self.server_url.trim_end_matches('/')];
        if let Some(repository) = self.repository.as_deref() {
            segments.push(repository.trim_matches('/'));
        }
        segments.push("actions/runs");
        segments.push(run_id);
        Some(segments.join("/"))
    }

    /// Static site published for the repository, `https://<owner>.<pages_host>/<name>/`
    pub fn dashboard_url(&self) -> Option<String> {
        let (owner, name) = self.repository.as_deref()?.split_once('/')?;
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(format!("https://{}.{}/{}/", owner, self.pages_host, name))
    }
}

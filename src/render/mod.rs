use crate::models::ReplacementRecord;
use tracing::warn;

/// The list container the renderer writes into. Children only accumulate;
/// there is no clearing operation, so rendering twice into the same
/// container appends a second set of items.
#[derive(Debug, Default)]
pub struct ListContainer {
    items: Vec<String>,
}

impl ListContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: impl Into<String>) {
        self.items.push(text.into());
    }

    pub fn children(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The list-item fragment as it appears under the container element
    pub fn to_html(&self) -> String {
        self.items
            .iter()
            .map(|text| format!("<li class=\"list-group-item\">{}</li>", text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fetches the replacement feed once and appends one list item per record,
/// or a single placeholder item when the feed is empty. Transport and
/// decode failures are logged and leave the container untouched; nothing
/// surfaces to the caller.
pub struct ReplacementListRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl ReplacementListRenderer {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/get_replacements", base_url.trim_end_matches('/')),
        }
    }

    /// One fetch-then-render pass
    pub async fn run(&self, container: &mut ListContainer) {
        match self.fetch().await {
            Ok(records) => render_into(container, &records),
            Err(e) => warn!("Failed to load replacements from {}: {}", self.endpoint, e),
        }
    }

    async fn fetch(&self) -> Result<Vec<ReplacementRecord>, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

/// Append one item per record in input order, or the placeholder for an
/// empty feed. Field values are substituted verbatim.
pub fn render_into(container: &mut ListContainer, records: &[ReplacementRecord]) {
    if records.is_empty() {
        container.append("No replacements assigned.");
        return;
    }

    for record in records {
        container.append(format!(
            "{} is replaced by {} on {}",
            record.employee_on_leave, record.replacement_employee, record.date
        ));
    }
}

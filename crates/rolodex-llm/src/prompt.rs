//! Prompt for the networking note

use rolodex_domain::ProfileRecord;

const INSTRUCTIONS: &str = "Given the profile below and MY background, write 2 sentences max on how \
this person could be helpful to have in my network. Write in third person (e.g. \"They could \
help with...\"). Be specific and brief.";

/// Builds the prompt asking how a profile could help the user's network
pub struct NotePrompt<'a> {
    record: &'a ProfileRecord,
    background: Option<&'a str>,
}

impl<'a> NotePrompt<'a> {
    /// Create a new prompt builder for `record`
    pub fn new(record: &'a ProfileRecord) -> Self {
        Self {
            record,
            background: None,
        }
    }

    /// Describe the user asking; blank text counts as absent
    pub fn with_background(mut self, background: Option<&'a str>) -> Self {
        self.background = background.filter(|b| !b.trim().is_empty());
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let r = self.record;
        let mut prompt = String::new();

        prompt.push_str(INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "MY BACKGROUND: {}\n\n",
            self.background.unwrap_or("Not provided")
        ));

        prompt.push_str("THEIR PROFILE:\n");
        prompt.push_str(&format!("Name: {}\n", or_na(&r.name)));
        prompt.push_str(&format!("Headline: {}\n", or_na(&r.headline)));
        prompt.push_str(&format!("Company: {}\n", or_na(&r.current_company)));
        prompt.push_str(&format!("Title: {}\n", or_na(&r.current_title)));
        prompt.push_str(&format!("Location: {}\n", or_na(&r.location)));
        prompt.push_str(&format!("About: {}", or_na(&r.about)));

        prompt
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub title: String,
    pub resolution: Option<String>, // "1080p", "4K" etc., as written in the filename
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// "<Title> (<Year>)"
    pub folder_name: String,
    /// "<Title> (<Year>)[ <Resolution>]<.ext>"
    pub file_name: String,
}

use std::fmt;

/// Base URLs for the three backend services the client reads from.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    directory_url: String,
    ticketing_url: String,
    storage_url: String,
}

impl fmt::Debug for ServiceEndpoints {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ServiceEndpoints")
            .field("directory_url", &self.directory_url)
            .field("ticketing_url", &self.ticketing_url)
            .field("storage_url", &self.storage_url)
            .finish()
    }
}

impl ServiceEndpoints {
    pub fn new(
        directory_url: impl Into<String>,
        ticketing_url: impl Into<String>,
        storage_url: impl Into<String>,
    ) -> Self {
        Self {
            directory_url: trim_trailing_slash(directory_url.into()),
            ticketing_url: trim_trailing_slash(ticketing_url.into()),
            storage_url: trim_trailing_slash(storage_url.into()),
        }
    }

    pub fn users(&self) -> String {
        format!("{}/users/", self.directory_url)
    }

    pub fn admins(&self) -> String {
        format!("{}/admins/", self.directory_url)
    }

    pub fn own_profile(&self) -> String {
        format!("{}/admins/profile", self.directory_url)
    }

    pub fn tickets(&self) -> String {
        format!("{}/tickets/", self.ticketing_url)
    }

    pub fn ticket(&self, ticket_id: i64) -> String {
        format!("{}/tickets/{ticket_id}", self.ticketing_url)
    }

    pub fn ticket_files(&self, ticket_id: i64) -> String {
        format!("{}/tickets/{ticket_id}/files", self.ticketing_url)
    }

    pub fn ticket_messages(&self, ticket_id: i64) -> String {
        format!("{}/messages/{ticket_id}", self.ticketing_url)
    }

    pub fn file(&self, file_uuid: &str) -> String {
        format!("{}/file/{file_uuid}", self.storage_url)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

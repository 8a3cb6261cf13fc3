/// Response handle for one request.
///
/// The handle is buffered: `end` stores the final body and flips the completed
/// flag exactly once. Status and header writes after completion are ignored.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    finished: bool,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
            finished: false,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        if self.finished {
            tracing::debug!(status, "ignoring status change on a completed response");
            return;
        }
        self.status = status;
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Get a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value with the same name
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if self.finished {
            tracing::debug!(header = %name, "ignoring header on a completed response");
            return;
        }

        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Write the final body and mark the response complete.
    ///
    /// Returns `false` without touching the body if it was already complete.
    pub fn end(&mut self, body: impl Into<Vec<u8>>) -> bool {
        if self.finished {
            return false;
        }
        self.body = body.into();
        self.finished = true;
        true
    }
}

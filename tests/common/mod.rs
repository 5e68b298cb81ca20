#![allow(dead_code)]

pub mod scripted {
    use petclinic_loadtest::client::{ApiClient, ApiRequest, ApiResponse, Method};
    use petclinic_loadtest::error::ClientError;
    use std::collections::HashMap;

    #[derive(Clone)]
    enum Reply {
        Respond(ApiResponse),
        Fail(ClientError),
    }

    /// In-memory API: canned replies per (method, path), every request recorded.
    ///
    /// Unscripted routes answer 404.
    #[derive(Default)]
    pub struct ScriptedApi {
        replies: HashMap<(Method, String), Reply>,
        pub requests: Vec<ApiRequest>,
        pub flagged: Vec<String>,
    }

    impl ScriptedApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
            self.replies.insert(
                (method, path.to_string()),
                Reply::Respond(ApiResponse::new(status, body)),
            );
            self
        }

        pub fn fail(mut self, method: Method, path: &str, err: ClientError) -> Self {
            self.replies
                .insert((method, path.to_string()), Reply::Fail(err));
            self
        }

        /// `(method, path)` of every request sent so far, in order.
        pub fn sent(&self) -> Vec<(Method, String)> {
            self.requests
                .iter()
                .map(|r| (r.method, r.path.clone()))
                .collect()
        }
    }

    impl ApiClient for ScriptedApi {
        async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
            let key = (request.method, request.path.clone());
            self.requests.push(request);
            match self.replies.get(&key) {
                Some(Reply::Respond(response)) => Ok(response.clone()),
                Some(Reply::Fail(err)) => Err(err.clone()),
                None => Ok(ApiResponse::new(404, "")),
            }
        }

        fn flag_failure(&mut self, reason: &str) {
            self.flagged.push(reason.to_string());
        }
    }
}

pub mod fixtures {
    use chrono::NaiveDate;
    use petclinic_loadtest::fake::FakeData;

    /// Fixed field values; the birth date is always `today`.
    pub struct FixedFake;

    impl FakeData for FixedFake {
        fn first_name(&mut self) -> String {
            "George".into()
        }
        fn last_name(&mut self) -> String {
            "Franklin".into()
        }
        fn street_address(&mut self) -> String {
            "110 W. Liberty St.".into()
        }
        fn city(&mut self) -> String {
            "Madison".into()
        }
        fn phone_number(&mut self) -> String {
            "+1 (608) 555-1023".into()
        }
        fn pet_name(&mut self) -> String {
            "Leo".into()
        }
        fn birth_date(&mut self, today: NaiveDate) -> NaiveDate {
            today
        }
    }

    pub const OWNER_42: &str = r#"{"id":42,"firstName":"George","lastName":"Franklin","address":"110 W. Liberty St.","city":"Madison","telephone":"1608555102","pets":[]}"#;
    pub const PET_7: &str = r#"{"id":7,"name":"Leo","birthDate":"2020-09-07","type":{"id":3,"name":"lizard"},"ownerId":42,"visits":[]}"#;
}

pub mod server {
    use std::io::Read;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::thread::JoinHandle;
    use std::time::Duration;

    use tiny_http::{Header, Response, Server};

    /// One request as the stand-in server saw it.
    #[derive(Debug, Clone)]
    pub struct Seen {
        pub method: String,
        pub url: String,
        pub accept: Option<String>,
        pub content_type: Option<String>,
        pub body: String,
    }

    impl Seen {
        pub fn line(&self) -> String {
            format!("{} {}", self.method, self.url)
        }
    }

    /// `(method, url) -> (status, body)`
    pub type Route = fn(&str, &str) -> (u16, &'static str);

    /// Answers like a healthy PetClinic that assigns owner 42 and pet 7.
    pub fn petclinic(method: &str, url: &str) -> (u16, &'static str) {
        match (method, url) {
            ("POST", "/petclinic/api/owners") => (201, r#"{"id":42,"firstName":"x"}"#),
            ("POST", "/petclinic/api/owners/42/pets") => (201, r#"{"id":7,"name":"x"}"#),
            ("GET", "/petclinic/api/owners")
            | ("GET", "/petclinic/api/pets")
            | ("GET", "/petclinic/api/vets")
            | ("GET", "/petclinic/api/visits") => (200, "[]"),
            ("GET", "/petclinic/actuator/health") => (200, r#"{"status":"UP"}"#),
            ("DELETE", "/petclinic/api/pets/7") => (204, ""),
            ("DELETE", "/petclinic/api/owners/42") => (204, ""),
            _ => (404, r#"{"error":"not found"}"#),
        }
    }

    fn header(request: &tiny_http::Request, name: &'static str) -> Option<String> {
        request
            .headers()
            .iter()
            .find(|h| h.field.equiv(name))
            .map(|h| h.value.as_str().to_string())
    }

    /// Serve `route` on a free local port until no request arrives for `idle`.
    pub fn start(route: Route, idle: Duration) -> (SocketAddr, Arc<Mutex<Vec<Seen>>>, JoinHandle<()>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let handle = std::thread::spawn(move || {
            while let Ok(Some(mut request)) = server.recv_timeout(idle) {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body).unwrap();
                let method = request.method().to_string();
                let url = request.url().to_string();
                log.lock().unwrap().push(Seen {
                    accept: header(&request, "Accept"),
                    content_type: header(&request, "Content-Type"),
                    method: method.clone(),
                    url: url.clone(),
                    body,
                });
                let (status, reply) = route(&method, &url);
                let json =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                request
                    .respond(
                        Response::from_string(reply)
                            .with_status_code(status)
                            .with_header(json),
                    )
                    .unwrap();
            }
        });
        (addr, seen, handle)
    }
}

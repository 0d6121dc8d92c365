/// Minimal single-threaded HTTP responder for exercising the fetch client
/// without the live API.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Serves `routes` (station id, status, body) on a local port, one
/// connection per expected request. Returns the base URL to pass to
/// the fetch functions.
pub(crate) fn serve(routes: Vec<(&'static str, u16, String)>, requests: usize) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let base_url = format!("http://{}/stationId", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.expect("accept connection");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let request = String::from_utf8_lossy(&request);
            let path = request.split_whitespace().nth(1).unwrap_or("");
            let (status, body) = routes
                .iter()
                .find(|(id, _, _)| path.ends_with(&format!("/{}", id)))
                .map(|(_, status, body)| (*status, body.clone()))
                .unwrap_or((404, "{}".to_string()));

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).expect("write response");
        }
    });

    (base_url, handle)
}

pub(crate) fn local_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("client should build")
}

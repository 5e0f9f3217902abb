//! Artifact download into the staging directory.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use crate::UpdateError;
use crate::http_client;

const MAX_ARTIFACT_BYTES: usize = 1024 * 1024 * 1024;

/// Stream `url` into `staging_dir/file_name`, overwriting any prior staged
/// copy of the same name.
///
/// Bytes land under a `.part` name first and are renamed into place once the
/// transfer completes, so a mid-stream failure never leaves a truncated file
/// under the final name.
pub fn download_artifact(
    url: &str,
    staging_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, UpdateError> {
    fs::create_dir_all(staging_dir)?;
    let dest = staging_dir.join(file_name);
    let partial = partial_path(&dest);

    let response = http_client::agent()
        .get(url)
        .set("User-Agent", http_client::USER_AGENT)
        .call()
        .map_err(|err| UpdateError::Http(err.to_string()))?;

    let result = write_partial(response, &partial);
    if let Err(err) = result {
        let _ = fs::remove_file(&partial);
        return Err(err);
    }
    fs::rename(&partial, &dest)?;
    Ok(dest)
}

fn write_partial(response: ureq::Response, partial: &Path) -> Result<(), UpdateError> {
    let mut file = File::create(partial)?;
    http_client::copy_response_to_writer(response, &mut file, MAX_ARTIFACT_BYTES)?;
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact")
        .to_string();
    name.push_str(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(&response);
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn downloads_into_staging_dir() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("update");
        let body = b"jar bytes".to_vec();
        let mut response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(&body);
        let url = serve_once(response);

        let dest = download_artifact(&url, &staging, "demo.jar").unwrap();
        assert_eq!(dest, staging.join("demo.jar"));
        assert_eq!(fs::read(&dest).unwrap(), body);
        assert!(!staging.join("demo.jar.part").exists());
    }

    #[test]
    fn overwrites_previously_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("update");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("demo.jar"), b"stale").unwrap();

        let body = b"fresh".to_vec();
        let mut response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(&body);
        let url = serve_once(response);

        download_artifact(&url, &staging, "demo.jar").unwrap();
        assert_eq!(fs::read(staging.join("demo.jar")).unwrap(), body);
    }

    #[test]
    fn truncated_transfer_leaves_no_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("update");
        // Content-Length promises more bytes than the server sends.
        let response = b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort".to_vec();
        let url = serve_once(response);

        let err = download_artifact(&url, &staging, "demo.jar").unwrap_err();
        assert!(matches!(err, UpdateError::Io(_) | UpdateError::Http(_)));
        assert!(!staging.join("demo.jar").exists());
    }

    #[test]
    fn http_error_status_is_surfaced() {
        let response = b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec();
        let url = serve_once(response);
        let dir = tempfile::tempdir().unwrap();

        let err = download_artifact(&url, dir.path(), "demo.jar").unwrap_err();
        assert!(matches!(err, UpdateError::Http(_)));
    }
}

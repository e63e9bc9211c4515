//! Loads the IBGE municipality registry, keeping a bincode copy on disk so later runs
//! do not hit the service again.

use crate::registry::error::RegistryError;
use crate::types::entity::CanonicalEntity;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{debug, info, warn};
use reqwest::Client;
use std::path::Path;

const BINCODE_CACHE_FILE_NAME: &str = "municipios.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// Returns the registry from `cache_dir` if cached, otherwise fetches it from `url`
/// and writes the cache.
///
/// With `refresh` set the cache is ignored and overwritten. An unreadable cache file
/// is treated like a missing one, and a failed cache write only logs a warning.
pub async fn load_registry(
    client: &Client,
    url: &str,
    cache_dir: &Path,
    refresh: bool,
) -> Result<Vec<CanonicalEntity>, RegistryError> {
    let cache_file = cache_dir.join(BINCODE_CACHE_FILE_NAME);

    if !refresh && cache_file.exists() {
        let path_clone = cache_file.clone();
        match tokio::task::spawn_blocking(move || read_cache(&path_clone)).await? {
            Ok(entities) if !entities.is_empty() => {
                debug!(
                    "Loaded {} municipalities from {}",
                    entities.len(),
                    cache_file.display()
                );
                return Ok(entities);
            }
            Ok(_) => warn!("Registry cache {} is empty, refetching", cache_file.display()),
            Err(e) => warn!("Ignoring unreadable registry cache: {}", e),
        }
    }

    info!("Fetching municipality registry from {}", url);
    let entities = fetch_registry(client, url).await?;
    if let Err(e) = write_cache(entities.clone(), &cache_file).await {
        warn!("Registry fetched but not cached: {}", e);
    }
    Ok(entities)
}

async fn fetch_registry(client: &Client, url: &str) -> Result<Vec<CanonicalEntity>, RegistryError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RegistryError::NetworkRequest(url.to_string(), e))?;
    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            return Err(match e.status() {
                Some(status) => RegistryError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                },
                None => RegistryError::NetworkRequest(url.to_string(), e),
            });
        }
    };
    let body = response
        .bytes()
        .await
        .map_err(|e| RegistryError::NetworkRequest(url.to_string(), e))?;

    let entities = tokio::task::spawn_blocking(move || parse_registry(&body)).await??;
    if entities.is_empty() {
        return Err(RegistryError::Empty(url.to_string()));
    }
    info!("Parsed {} municipalities", entities.len());
    Ok(entities)
}

/// Parses the registry JSON array. Fields other than `id` and `nome` are ignored.
pub fn parse_registry(bytes: &[u8]) -> Result<Vec<CanonicalEntity>, RegistryError> {
    Ok(serde_json::from_slice::<Vec<CanonicalEntity>>(bytes)?)
}

fn read_cache(cache_path: &Path) -> Result<Vec<CanonicalEntity>, RegistryError> {
    let bytes = std::fs::read(cache_path)
        .map_err(|e| RegistryError::CacheRead(cache_path.to_path_buf(), e))?;
    let (entities, _) =
        bincode::serde::decode_from_slice::<Vec<CanonicalEntity>, _>(&bytes, BINCODE_CONFIG)
            .map_err(|e| RegistryError::CacheDecode(cache_path.to_path_buf(), Box::new(e)))?;
    Ok(entities)
}

async fn write_cache(entities: Vec<CanonicalEntity>, cache_path: &Path) -> Result<(), RegistryError> {
    let encoded = tokio::task::spawn_blocking(move || {
        bincode::serde::encode_to_vec(entities, BINCODE_CONFIG)
            .map_err(|e| RegistryError::CacheEncode(Box::new(e)))
    })
    .await??;
    tokio::fs::write(cache_path, &encoded)
        .await
        .map_err(|e| RegistryError::CacheWrite(cache_path.to_path_buf(), e))?;
    debug!(
        "Wrote registry cache ({} bytes) to {}",
        encoded.len(),
        cache_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IBGE_SAMPLE: &str = r#"[
        {
            "id": 1100015,
            "nome": "Alta Floresta D'Oeste",
            "microrregiao": {
                "id": 11006,
                "nome": "Cacoal",
                "mesorregiao": { "id": 1102, "nome": "Leste Rondoniense" }
            }
        },
        { "id": 3550308, "nome": "São Paulo" }
    ]"#;

    // Nothing listens on the discard port, so any fetch fails fast.
    const UNREACHABLE_URL: &str = "http://127.0.0.1:9/municipios";

    #[test]
    fn test_parse_registry_sample() {
        let entities = parse_registry(IBGE_SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            entities,
            vec![
                CanonicalEntity::new(1100015, "Alta Floresta D'Oeste"),
                CanonicalEntity::new(3550308, "São Paulo"),
            ]
        );
    }

    #[test]
    fn test_parse_registry_rejects_garbage() {
        assert!(matches!(
            parse_registry(b"<html>maintenance</html>"),
            Err(RegistryError::JsonParse(_))
        ));
    }

    #[tokio::test]
    async fn test_cache_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(BINCODE_CACHE_FILE_NAME);
        let entities = parse_registry(IBGE_SAMPLE.as_bytes())?;

        write_cache(entities.clone(), &path).await?;
        assert_eq!(read_cache(&path)?, entities);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_prefers_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let entities = vec![CanonicalEntity::new(4314902, "Porto Alegre")];
        write_cache(entities.clone(), &dir.path().join(BINCODE_CACHE_FILE_NAME)).await?;

        let loaded = load_registry(&Client::new(), UNREACHABLE_URL, dir.path(), false).await?;
        assert_eq!(loaded, entities);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let entities = vec![CanonicalEntity::new(4314902, "Porto Alegre")];
        write_cache(entities, &dir.path().join(BINCODE_CACHE_FILE_NAME)).await?;

        let result = load_registry(&Client::new(), UNREACHABLE_URL, dir.path(), true).await;
        assert!(matches!(result, Err(RegistryError::NetworkRequest(_, _))));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_to_fetch() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(BINCODE_CACHE_FILE_NAME), b"\x01")?;

        let result = load_registry(&Client::new(), UNREACHABLE_URL, dir.path(), false).await;
        assert!(matches!(result, Err(RegistryError::NetworkRequest(_, _))));
        Ok(())
    }

    /// Serves `body` once as a JSON response and returns the URL to request.
    async fn serve_once(body: &'static str) -> Result<String, std::io::Error> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/municipios", listener.local_addr()?);
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Ok(url)
    }

    #[tokio::test]
    async fn test_unwritable_cache_keeps_fetched_registry() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        // a directory where the cache file should be: reads and writes both fail
        std::fs::create_dir(dir.path().join(BINCODE_CACHE_FILE_NAME))?;
        let url = serve_once(IBGE_SAMPLE).await?;

        let loaded = load_registry(&Client::new(), &url, dir.path(), false).await?;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1], CanonicalEntity::new(3550308, "São Paulo"));
        assert!(dir.path().join(BINCODE_CACHE_FILE_NAME).is_dir());
        Ok(())
    }
}

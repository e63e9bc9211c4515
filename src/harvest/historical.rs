//! Downloads and unpacks the yearly archives listed on the INMET historical data page.

use crate::harvest::error::HarvestError;
use crate::harvest::http::{get_text, send};
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::{Client, Url};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;
use zip::ZipArchive;

/// A downloadable archive found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLink {
    pub url: String,
    /// File name without the `.zip` extension, e.g. `"2019"`.
    pub stem: String,
}

/// Collects the archive link of every `post-preview` article on the page.
///
/// Only the first link of an article is considered, and only when it points to a
/// `.zip`. Relative links are prefixed with `page_url`.
pub fn find_archive_links(html: &str, page_url: &str) -> Result<Vec<ArchiveLink>, HarvestError> {
    let article =
        Regex::new(r#"(?is)<article\b[^>]*\bclass\s*=\s*["'][^"']*\bpost-preview\b[^"']*["'][^>]*>(.*?)</article>"#)?;
    let anchor = Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["']"#)?;

    let mut links = Vec::new();
    for block in article.captures_iter(html) {
        let Some(href) = anchor.captures(&block[1]).map(|c| c[1].trim().to_string()) else {
            continue;
        };
        if !href.ends_with(".zip") {
            debug!("Ignoring non-archive link {}", href);
            continue;
        }
        let absolute = if href.starts_with("http") {
            href
        } else {
            format!("{}{}", page_url, href)
        };
        let url = Url::parse(&absolute).map_err(|e| HarvestError::InvalidUrl {
            url: absolute.clone(),
            reason: e.to_string(),
        })?;
        let stem = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .and_then(|name| name.strip_suffix(".zip"))
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| HarvestError::InvalidUrl {
                url: absolute.clone(),
                reason: "no archive file name".to_string(),
            })?
            .to_string();
        links.push(ArchiveLink {
            url: url.to_string(),
            stem,
        });
    }
    Ok(links)
}

/// Fetches the listing at `page_url`, then downloads and extracts each archive into
/// `destination`. Returns the directories archives were extracted into.
///
/// Failing to fetch the listing or to create `destination` is fatal. A failed archive
/// is logged and skipped.
pub async fn harvest_historical(
    client: &Client,
    page_url: &str,
    destination: &Path,
) -> Result<Vec<PathBuf>, HarvestError> {
    info!("Scanning {} for historical archives", page_url);
    let html = get_text(client, page_url).await?;
    let links = find_archive_links(&html, page_url)?;
    info!("Found {} archives", links.len());

    tokio::fs::create_dir_all(destination)
        .await
        .map_err(|e| HarvestError::DirCreation(destination.to_path_buf(), e))?;

    let mut extracted = Vec::with_capacity(links.len());
    for link in links {
        match fetch_archive(client, &link, destination).await {
            Ok(dir) => {
                info!("Extracted {} into {}", link.stem, dir.display());
                extracted.push(dir);
            }
            Err(e) => warn!("Skipping archive {}: {}", link.url, e),
        }
    }
    Ok(extracted)
}

async fn fetch_archive(
    client: &Client,
    link: &ArchiveLink,
    destination: &Path,
) -> Result<PathBuf, HarvestError> {
    let zip_path = destination.join(format!("{}.zip", link.stem));
    if let Err(e) = download(client, &link.url, &zip_path).await {
        // Leave no partial archive behind
        let _ = tokio::fs::remove_file(&zip_path).await;
        return Err(e);
    }

    let destination = destination.to_path_buf();
    let stem = link.stem.clone();
    tokio::task::spawn_blocking(move || extract_archive(&zip_path, &destination, &stem)).await?
}

async fn download(client: &Client, url: &str, target: &Path) -> Result<(), HarvestError> {
    info!("Downloading {}", url);
    let response = send(client.get(url), url).await?;
    let stream = response
        .bytes_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
    let mut reader = StreamReader::new(stream);

    let file = tokio::fs::File::create(target)
        .await
        .map_err(|e| HarvestError::FileWrite(target.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    let written = tokio::io::copy(&mut reader, &mut writer)
        .await
        .map_err(HarvestError::DownloadIo)?;
    writer
        .flush()
        .await
        .map_err(|e| HarvestError::FileWrite(target.to_path_buf(), e))?;
    debug!("Wrote {} bytes to {}", written, target.display());
    Ok(())
}

/// Extracts `zip_path` and deletes it.
///
/// Archives that carry their own directory entries are extracted straight into
/// `destination`; flat archives go into `destination/stem`.
pub fn extract_archive(
    zip_path: &Path,
    destination: &Path,
    stem: &str,
) -> Result<PathBuf, HarvestError> {
    let file =
        File::open(zip_path).map_err(|e| HarvestError::FileRead(zip_path.to_path_buf(), e))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| HarvestError::ZipExtract(zip_path.to_path_buf(), e))?;

    let has_directories = archive.file_names().any(|name| name.ends_with('/'));
    let target = if has_directories {
        destination.to_path_buf()
    } else {
        destination.join(stem)
    };
    std::fs::create_dir_all(&target).map_err(|e| HarvestError::DirCreation(target.clone(), e))?;
    archive
        .extract(&target)
        .map_err(|e| HarvestError::ZipExtract(zip_path.to_path_buf(), e))?;
    drop(archive);

    std::fs::remove_file(zip_path)
        .map_err(|e| HarvestError::FileRemoval(zip_path.to_path_buf(), e))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const PAGE_URL: &str = "https://portal.inmet.gov.br/dadoshistoricos";

    const LISTING_FIXTURE: &str = r#"
<main>
  <article class="post-preview">
    <a href="https://portal.inmet.gov.br/uploads/dadoshistoricos/2000.zip">ANO 2000 (AUTOMÁTICA)</a>
  </article>
  <article class="post-preview featured">
    <a class="btn" href="/uploads/2001.zip">ANO 2001</a>
  </article>
  <article class="post-preview">
    <a href="/noticias/aviso">Aviso</a>
    <a href="/uploads/2002.zip">ANO 2002</a>
  </article>
  <article class="news">
    <a href="/uploads/2003.zip">ANO 2003</a>
  </article>
</main>"#;

    fn write_zip(path: &Path, entries: &[(&str, Option<&str>)]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            match content {
                Some(body) => {
                    writer.start_file(*name, options).unwrap();
                    writer.write_all(body.as_bytes()).unwrap();
                }
                None => writer.add_directory(*name, options).unwrap(),
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_find_archive_links() {
        let links = find_archive_links(LISTING_FIXTURE, PAGE_URL).unwrap();
        assert_eq!(
            links,
            vec![
                ArchiveLink {
                    url: "https://portal.inmet.gov.br/uploads/dadoshistoricos/2000.zip".to_string(),
                    stem: "2000".to_string(),
                },
                ArchiveLink {
                    url: "https://portal.inmet.gov.br/dadoshistoricos/uploads/2001.zip".to_string(),
                    stem: "2001".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_no_articles() {
        assert!(find_archive_links("<html></html>", PAGE_URL)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_flat_archive_goes_into_stem_dir() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("2019.zip");
        write_zip(
            &zip_path,
            &[
                ("INMET_S_RS_A801_PORTO ALEGRE.CSV", Some("Data;Hora\n")),
                ("INMET_S_SC_A806_FLORIANOPOLIS.CSV", Some("Data;Hora\n")),
            ],
        );

        let target = extract_archive(&zip_path, dir.path(), "2019").unwrap();
        assert_eq!(target, dir.path().join("2019"));
        assert!(target.join("INMET_S_RS_A801_PORTO ALEGRE.CSV").is_file());
        assert!(!zip_path.exists());
    }

    #[test]
    fn test_nested_archive_extracts_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("2001.zip");
        write_zip(
            &zip_path,
            &[
                ("2001/", None),
                ("2001/INMET_CO_DF_A001_BRASILIA.CSV", Some("Data;Hora\n")),
            ],
        );

        let target = extract_archive(&zip_path, dir.path(), "2001").unwrap();
        assert_eq!(target, dir.path());
        assert!(dir.path().join("2001").join("INMET_CO_DF_A001_BRASILIA.CSV").is_file());
        assert!(!zip_path.exists());
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("broken.zip");
        std::fs::write(&zip_path, b"not a zip").unwrap();
        assert!(matches!(
            extract_archive(&zip_path, dir.path(), "broken"),
            Err(HarvestError::ZipExtract(_, _))
        ));
    }
}

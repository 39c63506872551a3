// src/services/storage_service.rs
//
// Armazenamento de arquivos (PDFs) e links assinados de download.

use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{common::error::AppError, models::health::SignedLink};

const DOWNLOAD_PURPOSE: &str = "download";

#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), AppError>;
    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError>;
    /// Remover algo que não existe não é erro.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Chaves relativas, só com caracteres seguros e sem `..`.
pub fn validate_key(key: &str) -> Result<(), AppError> {
    let invalid = || AppError::InvalidInput(format!("Chave de arquivo inválida: '{}'", key));

    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(invalid());
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/');
    if !key.chars().all(allowed) {
        return Err(invalid());
    }
    let all_normal = Path::new(key)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !all_normal || key.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(invalid());
    }
    Ok(())
}

// =========================================================================
//  DISCO LOCAL
// =========================================================================

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Arquivo gravado: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound("Arquivo".into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =========================================================================
//  LINKS ASSINADOS
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
struct DownloadClaims {
    sub: String,       // Chave do arquivo
    file_name: String, // Nome sugerido no download
    purpose: String,
    exp: usize,
}

/// Arquivo liberado por um link assinado.
#[derive(Debug, PartialEq, Eq)]
pub struct DownloadGrant {
    pub key: String,
    pub file_name: String,
}

#[derive(Clone)]
pub struct StorageService {
    storage: Arc<dyn ObjectStorage>,
    secret: String,
    ttl: Duration,
}

impl StorageService {
    pub fn new(storage: Arc<dyn ObjectStorage>, secret: String, ttl_secs: i64) -> Self {
        Self { storage, secret, ttl: Duration::seconds(ttl_secs) }
    }

    pub fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }

    pub fn sign(&self, key: &str, file_name: &str) -> Result<SignedLink, AppError> {
        self.sign_at(key, file_name, Utc::now())
    }

    fn sign_at(&self, key: &str, file_name: &str, now: DateTime<Utc>) -> Result<SignedLink, AppError> {
        validate_key(key)?;
        let expires_at = now + self.ttl;
        let claims = DownloadClaims {
            sub: key.to_string(),
            file_name: file_name.to_string(),
            purpose: DOWNLOAD_PURPOSE.to_string(),
            exp: expires_at.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )?;
        Ok(SignedLink { url: format!("/api/files/{}", token), expires_at })
    }

    /// Confere assinatura, validade e finalidade do token.
    pub fn verify(&self, token: &str) -> Result<DownloadGrant, AppError> {
        let data = decode::<DownloadClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        if data.claims.purpose != DOWNLOAD_PURPOSE {
            return Err(AppError::InvalidToken);
        }
        validate_key(&data.claims.sub)?;
        Ok(DownloadGrant { key: data.claims.sub, file_name: data.claims.file_name })
    }
}

/// Nome de arquivo seguro para o cabeçalho Content-Disposition.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() { "documento.pdf".to_string() } else { cleaned.to_string() }
}

/// Os bytes parecem um PDF?
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsafe_keys() {
        assert!(validate_key("residents/abc/doc.pdf").is_ok());
        for key in ["", "/etc/passwd", "../segredo", "a/../b", "a//b", "a\\b", "a/ b", "./a"] {
            assert!(validate_key(key).is_err(), "deveria rejeitar {:?}", key);
        }
    }

    #[tokio::test]
    async fn local_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.put("licenses/1/alvara.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(storage.get("licenses/1/alvara.pdf").await.unwrap(), b"%PDF-1.4");

        storage.delete("licenses/1/alvara.pdf").await.unwrap();
        assert!(matches!(storage.get("licenses/1/alvara.pdf").await, Err(AppError::NotFound(_))));
        // Apagar de novo não falha
        storage.delete("licenses/1/alvara.pdf").await.unwrap();
    }

    fn service() -> StorageService {
        let dir = std::env::temp_dir();
        StorageService::new(Arc::new(LocalStorage::new(dir)), "segredo-de-teste".into(), 3600)
    }

    fn token_of(link: &SignedLink) -> &str {
        link.url.trim_start_matches("/api/files/")
    }

    #[test]
    fn signed_link_roundtrip() {
        let svc = service();
        let link = svc.sign("residents/1/exame.pdf", "exame.pdf").unwrap();
        let grant = svc.verify(token_of(&link)).unwrap();
        assert_eq!(grant.key, "residents/1/exame.pdf");
        assert_eq!(grant.file_name, "exame.pdf");
    }

    #[test]
    fn expired_or_tampered_links_are_rejected() {
        let svc = service();
        let old = svc
            .sign_at("residents/1/exame.pdf", "exame.pdf", Utc::now() - Duration::hours(3))
            .unwrap();
        assert!(matches!(svc.verify(token_of(&old)), Err(AppError::InvalidToken)));

        let other = StorageService::new(
            Arc::new(LocalStorage::new(std::env::temp_dir())),
            "outro-segredo".into(),
            3600,
        );
        let link = other.sign("residents/1/exame.pdf", "exame.pdf").unwrap();
        assert!(matches!(svc.verify(token_of(&link)), Err(AppError::InvalidToken)));
    }

    #[test]
    fn login_tokens_are_not_download_links() {
        let svc = service();
        #[derive(Serialize)]
        struct LoginLike {
            sub: String,
            exp: usize,
        }
        let token = encode(
            &Header::default(),
            &LoginLike { sub: "residents/1/exame.pdf".into(), exp: (Utc::now().timestamp() + 60) as usize },
            &EncodingKey::from_secret("segredo-de-teste".as_bytes()),
        )
        .unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("../../x/\"laudo\".pdf"), "laudo.pdf");
        assert_eq!(sanitize_file_name("   "), "documento.pdf");
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b"GIF89a"));
    }
}

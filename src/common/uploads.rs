use std::path::Path;

use axum::extract::Multipart;
use uuid::Uuid;

use crate::common::error::AppError;

// Tipos de imagem aceitos para comprovantes. O conteúdo em si não é
// inspecionado: o comprovante é um blob opaco, só filtramos o MIME.
const ACCEPTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

fn extension_for(content_type: &str) -> Option<&'static str> {
    ACCEPTED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

/// Salva o comprovante enviado no campo multipart `receipt` e retorna a URL
/// pública (`/uploads/{arquivo}`) a ser gravada na entidade correspondente.
pub async fn save_receipt_image(
    mut multipart: Multipart,
    upload_dir: &Path,
) -> Result<String, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("receipt") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_owned)
            .ok_or_else(|| AppError::InvalidReceipt("Tipo do arquivo ausente.".into()))?;

        let ext = extension_for(&content_type).ok_or_else(|| {
            AppError::InvalidReceipt(format!(
                "O comprovante deve ser uma imagem (recebido: {}).",
                content_type
            ))
        })?;

        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::InvalidReceipt("O arquivo enviado está vazio.".into()));
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        tokio::fs::create_dir_all(upload_dir).await?;
        tokio::fs::write(upload_dir.join(&file_name), &bytes).await?;

        return Ok(format!("/uploads/{}", file_name));
    }

    Err(AppError::InvalidReceipt("Campo 'receipt' não encontrado no formulário.".into()))
}

/// Apaga o arquivo já gravado quando a entidade recusa o comprovante, para
/// não acumular órfãos no diretório de uploads.
pub async fn remove_saved_receipt(upload_dir: &Path, receipt_url: &str) {
    if let Some(file_name) = receipt_url.strip_prefix("/uploads/") {
        let _ = tokio::fs::remove_file(upload_dir.join(file_name)).await;
    }
}

/// Content-Type servido de volta a partir da extensão gravada.
pub fn content_type_for_file(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aceita_somente_mime_de_imagem() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for("text/html"), None);
    }

    #[tokio::test]
    async fn comprovante_recusado_nao_deixa_arquivo_orfao() {
        let dir = std::env::temp_dir().join(format!("uploads-teste-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let nome = format!("{}.png", Uuid::new_v4());
        tokio::fs::write(dir.join(&nome), b"img").await.unwrap();

        remove_saved_receipt(&dir, &format!("/uploads/{}", nome)).await;
        assert!(!dir.join(&nome).exists());

        // URL fora do prefixo público é ignorada, sem tocar no disco
        remove_saved_receipt(&dir, "/outro/arquivo.png").await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn content_type_volta_pela_extensao() {
        assert_eq!(content_type_for_file("a1b2.png"), "image/png");
        assert_eq!(content_type_for_file("a1b2.jpg"), "image/jpeg");
        assert_eq!(content_type_for_file("semextensao"), "application/octet-stream");
    }
}

//! User-facing text in the supported UI languages.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::models::CardField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            _ => Err(anyhow::anyhow!("Unsupported UI locale: {}", s)),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Locale::PtBr => write!(f, "pt-BR"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl Locale {
    pub fn field_label(self, field: CardField) -> &'static str {
        match (self, field) {
            (Locale::PtBr, CardField::CardHolderName) => "Nome do Titular",
            (Locale::PtBr, CardField::CardNumber) => "Número do Cartão",
            (Locale::PtBr, CardField::ExpirationDate) => "Data de Validade",
            (Locale::PtBr, CardField::PaymentNetwork) => "Bandeira",
            (Locale::PtBr, CardField::IssuingBank) => "Banco Emissor",
            (Locale::En, CardField::CardHolderName) => "Cardholder Name",
            (Locale::En, CardField::CardNumber) => "Card Number",
            (Locale::En, CardField::ExpirationDate) => "Expiration Date",
            (Locale::En, CardField::PaymentNetwork) => "Payment Network",
            (Locale::En, CardField::IssuingBank) => "Issuing Bank",
            (_, CardField::CardVerificationValue) => "CVV/CVC",
        }
    }

    pub fn not_detected(self) -> &'static str {
        match self {
            Locale::PtBr => "Não detectado",
            Locale::En => "Not detected",
        }
    }

    pub fn fields_detected(self, valid: usize, total: usize) -> String {
        match self {
            Locale::PtBr => format!("Campos detectados: {}/{}", valid, total),
            Locale::En => format!("Fields detected: {}/{}", valid, total),
        }
    }

    pub fn banner_full(self) -> &'static str {
        match self {
            Locale::PtBr => "Cartão validado com sucesso!",
            Locale::En => "Card validated successfully!",
        }
    }

    pub fn banner_partial(self, valid: usize, total: usize) -> String {
        match self {
            Locale::PtBr => format!(
                "Cartão parcialmente validado. {}/{} campos detectados.",
                valid, total
            ),
            Locale::En => format!(
                "Card partially validated. {}/{} fields detected.",
                valid, total
            ),
        }
    }

    pub fn banner_none(self) -> &'static str {
        match self {
            Locale::PtBr => "Nenhuma informação de cartão detectada. Por favor, verifique a qualidade da imagem e tente novamente.",
            Locale::En => "No card information detected. Please check the image quality and try again.",
        }
    }

    pub fn upload_succeeded(self, file_name: &str) -> String {
        match self {
            Locale::PtBr => format!("Arquivo {} enviado com sucesso!", file_name),
            Locale::En => format!("File {} uploaded successfully!", file_name),
        }
    }

    pub fn upload_failed(self, file_name: &str) -> String {
        match self {
            Locale::PtBr => format!(
                "Erro ao enviar arquivo {} para o armazenamento. Por favor, tente novamente.",
                file_name
            ),
            Locale::En => format!(
                "Failed to upload file {} to storage. Please try again.",
                file_name
            ),
        }
    }

    pub fn analysis_complete(self) -> &'static str {
        match self {
            Locale::PtBr => "Análise concluída!",
            Locale::En => "Analysis complete!",
        }
    }

    pub fn page_title(self) -> &'static str {
        match self {
            Locale::PtBr => "Análise de Cartões de Crédito",
            Locale::En => "Credit Card Analysis",
        }
    }

    pub fn page_subtitle(self) -> &'static str {
        match self {
            Locale::PtBr => "Análise de cartões de crédito usando Azure Document Intelligence",
            Locale::En => "Credit card analysis using Azure Document Intelligence",
        }
    }

    pub fn upload_heading(self) -> &'static str {
        match self {
            Locale::PtBr => "Enviar Cartão de Crédito",
            Locale::En => "Upload Credit Card",
        }
    }

    pub fn upload_prompt(self) -> &'static str {
        match self {
            Locale::PtBr => "Selecione uma imagem do cartão de crédito",
            Locale::En => "Select a credit card image",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Locale::PtBr => "Analisar",
            Locale::En => "Analyze",
        }
    }

    pub fn image_heading(self) -> &'static str {
        match self {
            Locale::PtBr => "Imagem do Cartão",
            Locale::En => "Card Image",
        }
    }

    pub fn validation_heading(self) -> &'static str {
        match self {
            Locale::PtBr => "Validação das Informações",
            Locale::En => "Field Validation",
        }
    }

    pub fn usage_heading(self) -> &'static str {
        match self {
            Locale::PtBr => "Como usar",
            Locale::En => "How to use",
        }
    }

    pub fn usage_steps(self) -> [&'static str; 3] {
        match self {
            Locale::PtBr => [
                "Faça upload de uma imagem de cartão de crédito",
                "O sistema analisará automaticamente",
                "As informações serão validadas",
            ],
            Locale::En => [
                "Upload a credit card image",
                "The system analyzes it automatically",
                "The extracted information is validated",
            ],
        }
    }

    pub fn supported_formats(self, extensions: &[String]) -> String {
        let listed = extensions
            .iter()
            .map(|e| e.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        match self {
            Locale::PtBr => format!("Formatos suportados: {}", listed),
            Locale::En => format!("Supported formats: {}", listed),
        }
    }

    pub fn debug_banner(self) -> &'static str {
        match self {
            Locale::PtBr => "Modo DEBUG ativado",
            Locale::En => "DEBUG mode enabled",
        }
    }

    pub fn processing_failed(self) -> &'static str {
        match self {
            Locale::PtBr => "Erro ao processar arquivo",
            Locale::En => "Failed to process file",
        }
    }
}

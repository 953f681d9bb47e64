// src/i18n.rs
use serde::{Deserialize, Serialize};

/// Locales the relay can answer in. The UI toggle and the per-request
/// `language` field both map onto this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
        }
    }
}

/// One locale's full label set. Served as-is at `GET /i18n` so the UI can
/// swap labels without a rebuild; the server itself only consumes
/// `system_message`, `empty_message` and `error_message`.
#[derive(Debug, Serialize)]
pub struct Translations {
    pub title: &'static str,
    pub description: &'static str,
    pub system_message: &'static str,
    pub system_message_label: &'static str,
    pub max_tokens_label: &'static str,
    pub temperature_label: &'static str,
    pub top_p_label: &'static str,
    pub message_placeholder: &'static str,
    pub send_button: &'static str,
    pub clear_button: &'static str,
    pub info_section: &'static str,
    pub empty_message: &'static str,
    /// Template with a `{}` slot for the error detail.
    pub error_message: &'static str,
    pub examples: [&'static str; 4],
}

impl Translations {
    /// Fills the locale's error template with the error detail.
    pub fn format_error(&self, detail: &str) -> String {
        self.error_message.replace("{}", detail)
    }
}

pub const EN: Translations = Translations {
    title: "🤖 Chat Relay",
    description: "This is a chatbot backed by a hosted language model. To use:\n\
        1. Type your message in the field below\n\
        2. Adjust parameters as needed\n\
        3. Click Send or press Enter",
    system_message: "You are a helpful and friendly assistant.",
    system_message_label: "System Message",
    max_tokens_label: "Maximum Tokens",
    temperature_label: "Temperature",
    top_p_label: "Top-p (Nucleus Sampling)",
    message_placeholder: "Type your message here...",
    send_button: "Send",
    clear_button: "Clear Chat",
    info_section: "Model: configured server-side\nLanguage: English/Portuguese",
    empty_message: "Empty message, please send a valid message.",
    error_message: "Sorry, an error occurred: {}. Please check your connection and settings.",
    examples: [
        "Hello! How are you?",
        "Can you explain what artificial intelligence is?",
        "What is the capital of Brazil?",
        "Help me write a Python code to calculate Fibonacci.",
    ],
};

pub const PT: Translations = Translations {
    title: "🤖 Chat Relay em Português",
    description: "Este é um chatbot baseado em um modelo de linguagem hospedado. Para usar:\n\
        1. Digite sua mensagem no campo abaixo\n\
        2. Ajuste os parâmetros conforme necessário\n\
        3. Clique em Enviar ou pressione Enter",
    system_message: "Você é um assistente amigável e prestativo que responde em português.",
    system_message_label: "Mensagem do Sistema",
    max_tokens_label: "Máximo de Tokens",
    temperature_label: "Temperatura",
    top_p_label: "Top-p (Amostragem Nucleus)",
    message_placeholder: "Digite sua mensagem aqui...",
    send_button: "Enviar",
    clear_button: "Limpar Chat",
    info_section: "Modelo: configurado no servidor\nIdioma: Português/Inglês",
    empty_message: "Mensagem vazia, por favor, envie uma mensagem válida.",
    error_message: "Desculpe, ocorreu um erro: {}. Por favor, verifique sua conexão e configurações.",
    examples: [
        "Olá! Como você está?",
        "Pode me explicar o que é inteligência artificial?",
        "Qual é a capital do Brasil?",
        "Me ajude a escrever um código em Python para calcular fibonacci.",
    ],
};

/// Label set for a locale.
pub fn translations(language: Language) -> &'static Translations {
    match language {
        Language::En => &EN,
        Language::Pt => &PT,
    }
}

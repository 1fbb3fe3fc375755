use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Environment variables
/// fill in whatever the file leaves out.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   cors_allow_origin: "http://localhost:3000"
///
/// openai:
///   api_key: "sk-..."
///   base_url: "https://api.openai.com"
///   chat_model: "gpt-4o"
///   transcription_model: "whisper-1"
///
/// elevenlabs:
///   api_key: "your-elevenlabs-key"
///   base_url: "https://api.elevenlabs.io"
///   model_id: "eleven_flash_v2_5"
///   voice_ids:
///     - "ZF6FPAbjXT4488VcRRnw"
///     - "21m00Tcm4TlvDq8ikWAM"
///
/// tts:
///   max_attempts: 3
///   max_chars: 2500
///   request_timeout_seconds: 45
///   backoff_base_ms: 1000
///   header_text_max_chars: 8000
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub openai: Option<OpenAIYaml>,
    pub elevenlabs: Option<ElevenLabsYaml>,
    pub tts: Option<TtsYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_allow_origin: Option<String>,
}

/// OpenAI settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OpenAIYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub chat_model: Option<String>,
    pub transcription_model: Option<String>,
}

/// ElevenLabs settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ElevenLabsYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model_id: Option<String>,
    pub voice_ids: Option<Vec<String>>,
}

/// Synthesis limits from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub max_attempts: Option<u32>,
    pub max_chars: Option<usize>,
    pub request_timeout_seconds: Option<u64>,
    pub backoff_base_ms: Option<u64>,
    pub header_text_max_chars: Option<usize>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8080

openai:
  api_key: "sk-test"
  chat_model: "gpt-4o-mini"

elevenlabs:
  api_key: "el-key"
  voice_ids: ["voice-a", "voice-b"]

tts:
  max_attempts: 5
  max_chars: 1000
"#;
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let server = config.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(8080));

        let openai = config.openai.unwrap();
        assert_eq!(openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(openai.chat_model.as_deref(), Some("gpt-4o-mini"));
        assert!(openai.base_url.is_none());

        let elevenlabs = config.elevenlabs.unwrap();
        assert_eq!(
            elevenlabs.voice_ids,
            Some(vec!["voice-a".to_string(), "voice-b".to_string()])
        );

        let tts = config.tts.unwrap();
        assert_eq!(tts.max_attempts, Some(5));
        assert_eq!(tts.max_chars, Some(1000));
        assert!(tts.backoff_base_ms.is_none());
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.elevenlabs.is_none());
    }

    #[test]
    fn test_from_file_reads_and_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "server:\n  port: 9000\n").unwrap();

        let config = YamlConfig::from_file(&path).unwrap();
        assert_eq!(config.server.unwrap().port, Some(9000));
    }

    #[test]
    fn test_from_file_missing() {
        let result = YamlConfig::from_file(&PathBuf::from("/nonexistent/config.yaml"));
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }

    #[test]
    fn test_from_file_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "server: [unclosed").unwrap();

        let result = YamlConfig::from_file(&path);
        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }
}

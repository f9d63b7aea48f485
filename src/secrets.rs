use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// Third-party services whose keys the proxy holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    AssemblyAi,
    DeepL,
    Gemini,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::AssemblyAi, Service::DeepL, Service::Gemini];

    // path segment used in /api/keys/{service}
    pub fn name(&self) -> &'static str {
        match self {
            Service::AssemblyAi => "assemblyai",
            Service::DeepL => "deepl",
            Service::Gemini => "gemini",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Service::AssemblyAi => "ASSEMBLYAI_API_KEY",
            Service::DeepL => "DEEPL_API_KEY",
            Service::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL.into_iter().find(|svc| svc.name() == s).ok_or(())
    }
}

/// API keys held server-side, read once at startup.
///
/// A missing key is not an error here; the handler reports it per request.
#[derive(Clone, Default)]
pub struct Secrets {
    keys: HashMap<Service, String>,
}

// never print key material
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configured: Vec<&str> = self.keys.keys().map(|s| s.name()).collect();
        f.debug_struct("Secrets").field("configured", &configured).finish()
    }
}

impl Secrets {
    pub fn from_env() -> Self {
        let keys = Service::ALL
            .into_iter()
            .filter_map(|svc| {
                std::env::var(svc.env_var())
                    .ok()
                    .filter(|v| !v.is_empty())
                    .map(|v| (svc, v))
            })
            .collect();
        Self { keys }
    }

    pub fn with_key(mut self, service: Service, key: impl Into<String>) -> Self {
        self.keys.insert(service, key.into());
        self
    }

    pub fn get(&self, service: Service) -> Option<&str> {
        self.keys.get(&service).map(String::as_str)
    }

    pub fn configured(&self) -> impl Iterator<Item = Service> + '_ {
        self.keys.keys().copied()
    }
}

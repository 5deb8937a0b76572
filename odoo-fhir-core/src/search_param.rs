/// One token of a token search parameter, `[system|]code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParam {
    pub system: Option<String>,
    pub code: String,
}

impl TokenParam {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (system, code) = match raw.split_once('|') {
            Some((system, code)) => ((!system.is_empty()).then(|| system.to_string()), code),
            None => (None, raw),
        };
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        Some(Self {
            system,
            code: code.to_string(),
        })
    }
}

/// Comma-separated alternatives of a single parameter occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenOrListParam {
    pub tokens: Vec<TokenParam>,
}

/// Every occurrence of a token parameter in a query string, e.g.
/// `code=a,b&code=c` is `(a OR b) AND c`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenAndListParam {
    pub clauses: Vec<TokenOrListParam>,
}

impl TokenAndListParam {
    /// Parse the occurrences of `name` from a raw URL query string
    pub fn parse(query_string: &str, name: &str) -> Result<Self, String> {
        let mut clauses = Vec::new();

        for pair in query_string.split('&') {
            let Some((raw_key, raw_value)) = pair.split_once('=') else {
                continue;
            };

            let key = decode(raw_key)?;
            let (param_name, modifier) = match key.split_once(':') {
                Some((param_name, modifier)) => (param_name, Some(modifier)),
                None => (key.as_str(), None),
            };
            if param_name != name {
                continue;
            }
            if let Some(modifier) = modifier {
                return Err(format!("Unsupported modifier '{}' on parameter '{}'", modifier, name));
            }

            let value = decode(raw_value)?;
            let tokens: Vec<TokenParam> = value.split(',').filter_map(TokenParam::parse).collect();
            if !tokens.is_empty() {
                clauses.push(TokenOrListParam { tokens });
            }
        }

        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// All codes in query order, without duplicates
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for token in self.clauses.iter().flat_map(|clause| clause.tokens.iter()) {
            if !codes.contains(&token.code) {
                codes.push(token.code.clone());
            }
        }
        codes
    }
}

fn decode(raw: &str) -> Result<String, String> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| e.to_string())
}

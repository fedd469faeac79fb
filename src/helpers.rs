use std::collections::HashMap;

#[cfg(feature = "mainnet")]
pub const ADDRESS_PREFIX: &str = "kaspa:";

#[cfg(not(feature = "mainnet"))]
pub const ADDRESS_PREFIX: &str = "kaspatest:";

/// Length of the bech32 payload that follows the address prefix.
const ADDRESS_PAYLOAD_LEN: usize = 61;

/// Splits `(a,b),(c,d)` into `["a,b", "c,d"]`.
pub fn parse_tuple_string(data: String) -> Vec<String> {
    let Some(str) = data.trim_start().strip_prefix('(') else {
        return Vec::new();
    };
    let splited = str.split(",(");
    let mut items: Vec<String> = Vec::new();

    for c in splited {
        if let Some(index) = c.find(')') {
            let tuple_data = &c[0..index];
            items.push(tuple_data.to_owned());
        }
    }

    items
}

/// Parses `(address,label),(address,label)` into a lookup table keyed by
/// lowercase address.
pub fn parse_address_labels(data: String) -> HashMap<String, String> {
    let mut labels = HashMap::new();

    for item in parse_tuple_string(data) {
        if let Some((address, label)) = item.split_once(',') {
            let address = address.trim().to_lowercase();
            let label = label.trim();
            if !address.is_empty() && !label.is_empty() {
                labels.insert(address, label.to_owned());
            }
        }
    }

    labels
}

pub fn is_valid_address(address: &str) -> bool {
    let address = address.to_lowercase();
    match address.strip_prefix(ADDRESS_PREFIX) {
        Some(payload) => {
            payload.len() == ADDRESS_PAYLOAD_LEN
                && payload
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        },
        None => false,
    }
}

/// Glob match supporting `*` (any run, possibly empty) and `?` (exactly one
/// char).
pub fn glob_match(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let value: Vec<char> = value.chars().collect();

    let (mut p, mut v) = (0, 0);
    let mut star: Option<usize> = None;
    let mut star_v = 0;

    while v < value.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == value[v])
        {
            p += 1;
            v += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_v = v;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            star_v += 1;
            v = star_v;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }

    p == pattern.len()
}

/// Rounds to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

// Root domain matching for Host / Origin / Referer values

// Reduce a URL or bare host to its last two dot-separated labels
// "https://api.sub.example.com/path" -> "example.com"
//
// Ports are not stripped: "proxy.example.com:8080" -> "com:8080"
pub fn root_domain(input: &str) -> String {
    // strip scheme
    let rest = match input.split_once("://") {
        Some((_, rest)) => rest,
        None => input,
    };

    // strip path + query
    let hostname = rest.split('/').next().unwrap_or(rest);

    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() >= 2 {
        return labels[labels.len() - 2..].join(".");
    }

    hostname.to_string()
}

use crate::domain::models::Client;

/// Case-insensitive substring match over name or profession. An empty
/// term returns the full input; relative order is always preserved.
pub fn filter_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    if term.is_empty() {
        return clients.iter().collect();
    }
    let needle = term.to_lowercase();
    clients
        .iter()
        .filter(|client| {
            client.name.to_lowercase().contains(&needle)
                || client.profession.to_lowercase().contains(&needle)
        })
        .collect()
}

//! The API endpoints URIs.
//!
//! Tests can fill in the parameters of endpoints such as '/friends/{friend_id}' with `format_endpoint`.

/// The route for creating and listing friends.
pub const FRIENDS: &str = "/friends/";
/// The route for creating and listing friends without the trailing slash.
pub const FRIENDS_NO_SLASH: &str = "/friends";
/// The route to access a single friend.
pub const FRIEND: &str = "/friends/{friend_id}";
/// The route for listing the expenses a friend shares.
pub const FRIEND_EXPENSES: &str = "/friends/{friend_id}/expenses";
/// The route for creating and listing expenses.
pub const EXPENSES: &str = "/expenses/";
/// The route for creating and listing expenses without the trailing slash.
pub const EXPENSES_NO_SLASH: &str = "/expenses";
/// The route to access a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route for assigning friends to an expense and listing them.
pub const EXPENSE_FRIENDS: &str = "/expenses/{expense_id}/friends";
/// The route to access a single friend's standing on an expense.
pub const EXPENSE_FRIEND: &str = "/expenses/{expense_id}/friends/{friend_id}";

/// Replace the parameters in `endpoint_path` with `ids`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/friends/{friend_id}', '{friend_id}' is the parameter.
///
/// Parameters without a matching ID are left as is, and extra IDs are ignored.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, ids: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut ids = ids.iter();
    let mut rest = endpoint_path;

    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else {
            break;
        };
        let end = start + length;
        let is_parameter = rest[start + 1..end]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_');

        formatted.push_str(&rest[..start]);

        match is_parameter.then(|| ids.next()).flatten() {
            Some(id) => formatted.push_str(&id.to_string()),
            None => formatted.push_str(&rest[start..=end]),
        }

        rest = &rest[end + 1..];
    }

    formatted.push_str(rest);
    formatted
}

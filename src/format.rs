//! Presentation of generated passwords.

/// Split `password` into space-separated groups of `group_size` characters.
///
/// The last group may be shorter. A `group_size` of 0 leaves the password as is.
pub fn format_groups(password: &str, group_size: usize) -> String {
    if group_size == 0 {
        return password.to_owned();
    }
    let mut formatted = String::with_capacity(password.len() + password.len() / group_size);
    for (index, ch) in password.chars().enumerate() {
        if index > 0 && index % group_size == 0 {
            formatted.push(' ');
        }
        formatted.push(ch);
    }
    formatted
}

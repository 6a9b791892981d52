//! Easter egg: typing the secret word anywhere on the page fires confetti.

#[derive(Debug)]
pub struct SecretCodeWatcher {
    target: String,
    capacity: usize,
    buffer: String,
}

impl SecretCodeWatcher {
    pub fn new(target: &str, capacity: usize) -> Self {
        Self {
            target: target.to_lowercase(),
            capacity,
            buffer: String::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Recent keys, oldest first.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Feed one key as reported by the browser (`"a"`, `"Enter"`, ...).
    /// Returns true when the buffer contains the secret word; the buffer is
    /// then emptied.
    pub fn push_key(&mut self, key: &str) -> bool {
        self.buffer.push_str(&key.to_lowercase());
        if !self.target.is_empty() && self.buffer.contains(&self.target) {
            self.buffer.clear();
            return true;
        }
        let len = self.buffer.chars().count();
        if len > self.capacity {
            let cut = self
                .buffer
                .char_indices()
                .nth(len - self.capacity)
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.buffer.drain(..cut);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_contains_and_clears_everything() {
        let mut w = SecretCodeWatcher::new("amor", 10);
        let fired: Vec<bool> = ["x", "a", "m", "o", "r", "y"].iter().map(|k| w.push_key(k)).collect();
        assert_eq!(fired, vec![false, false, false, false, true, false]);
        assert_eq!(w.buffer(), "y");
    }

    #[test]
    fn uppercase_keys_count() {
        let mut w = SecretCodeWatcher::new("amor", 10);
        assert!(!w.push_key("A"));
        assert!(!w.push_key("M"));
        assert!(!w.push_key("o"));
        assert!(w.push_key("R"));
        assert_eq!(w.buffer(), "");
    }

    #[test]
    fn keeps_last_ten() {
        let mut w = SecretCodeWatcher::new("amor", 10);
        for c in "bcdefghijklmnpq".chars() {
            assert!(!w.push_key(&c.to_string()));
        }
        assert_eq!(w.buffer(), "ghijklmnpq");
        assert_eq!(w.buffer().chars().count(), 10);
    }

    #[test]
    fn named_keys_are_appended_whole() {
        let mut w = SecretCodeWatcher::new("amor", 10);
        w.push_key("Enter");
        assert_eq!(w.buffer(), "enter");
        w.push_key("a");
        w.push_key("m");
        w.push_key("o");
        assert!(w.push_key("r"));
    }
}

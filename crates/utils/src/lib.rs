use rand::Rng;

/// Generates an alphanumeric secret of the given length, used for
/// family api keys and the create-family code.
pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat(())
        .map(|_| rng.sample(rand::distributions::Alphanumeric))
        .map(char::from)
        .take(secret_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_secret_of_given_length() {
        for len in [1, 16, 64].iter() {
            assert_eq!(create_random_secret(*len).len(), *len);
        }
    }

    #[test]
    fn generates_distinct_secrets() {
        assert_ne!(create_random_secret(32), create_random_secret(32));
    }
}

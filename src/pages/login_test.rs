use super::*;

#[test]
fn sign_in_failed_message_names_the_provider() {
    assert_eq!(
        sign_in_failed_message("Google", "network unreachable"),
        "Sign-in with Google failed: network unreachable"
    );
}

#[cfg(not(feature = "csr"))]
mod native {
    use super::*;
    use crate::config::{OAuthProvider, SupabaseConfig};
    use crate::net::supabase::SupabaseClient;

    #[test]
    fn sign_in_error_surfaces_as_a_visible_message() {
        let backend = SupabaseClient::new(&SupabaseConfig {
            url: "https://proj.supabase.co".to_owned(),
            anon_key: "anon-key".to_owned(),
        });

        let result = futures::executor::block_on(
            backend.sign_in_with_oauth(OAuthProvider::Google, "https://app.example.com/auth/callback"),
        );
        let error = result.expect_err("sign-in cannot start outside the browser");

        assert_eq!(
            sign_in_failed_message("Google", &error),
            "Sign-in with Google failed: not available outside the browser"
        );
    }
}

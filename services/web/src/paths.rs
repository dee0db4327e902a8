//! Route table, view names, model keys and user-facing messages

/// Route templates as registered with the router
pub mod route {
    pub const HEALTH: &str = "/health";
    pub const DEFAULT: &str = "/";
    pub const INDEX: &str = "/index";
    pub const LOGIN: &str = "/login";
    pub const LOGOUT: &str = "/logout";

    pub const MOVIE: &str = "/movie/:movie_id";
    pub const POPULAR_MOVIES: &str = "/result";
    pub const RESULT_MOVIE: &str = "/result/:movie_title";
    pub const MOVIES: &str = "/movies";
    pub const DELETE_MOVIE: &str = "/movies/remove/:movie_id";
    pub const AUTOCOMPLETE_MOVIES: &str = "/getMovies";
    pub const RATE_MOVIE: &str = "/rateMovie";
    pub const REVIEW: &str = "/review";

    pub const REGISTER: &str = "/register";
    pub const VALIDATE_USERNAME: &str = "/checkusername";
    pub const VALIDATE_EMAIL: &str = "/checkuseremail";

    pub const USERS: &str = "/users";
    pub const USER: &str = "/users/:user_id";
    pub const DELETE_USER: &str = "/users/remove/:user_id";

    pub const PROFILE: &str = "/profile";
    pub const PROFILE_PASSWORD: &str = "/profile/password";
    pub const DELETE_PROFILE_REVIEW: &str = "/profile/remove/:review_id";
}

/// Redirect targets
pub mod redirect {
    pub const LOGIN: &str = "/login";
    pub const LOGIN_FAILED: &str = "/login?error=true";
    pub const LOGGED_OUT: &str = "/login?logout=true";
    pub const INDEX: &str = "/index";
    pub const MOVIES_SUCCESS: &str = "/movies?success=true";
    pub const MOVIES_FAIL: &str = "/movies?success=false";
    pub const REGISTER_SUCCESS: &str = "/register?success=true";
    pub const PROFILE_SUCCESS: &str = "/profile?success=true";
    pub const PROFILE_FAIL: &str = "/profile?success=false";

    /// Movie detail page for a code
    pub fn movie(code: &str) -> String {
        format!("/movie/{}", encode(code))
    }

    /// Movies listing carrying a status message
    pub fn movies_with_message(message: &str) -> String {
        format!("/movies?message={}", encode(message))
    }

    /// Users listing carrying a status message
    pub fn users_with_message(message: &str) -> String {
        format!("/users?message={}", encode(message))
    }

    fn encode(value: &str) -> String {
        value
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (b as char).to_string()
                }
                _ => format!("%{:02X}", b),
            })
            .collect()
    }
}

/// Template names handed to the rendering layer
pub mod page {
    pub const INDEX: &str = "index";
    pub const LOGIN: &str = "login";
    pub const MOVIE: &str = "movie";
    pub const RESULT: &str = "result";
    pub const MOVIES: &str = "movies";
    pub const REGISTER: &str = "register";
    pub const USERS: &str = "users";
    pub const USER: &str = "user-detail";
    pub const PROFILE: &str = "profile";
}

/// Model attribute keys
pub mod model {
    pub const USERS: &str = "users";
    pub const USER: &str = "user";
    pub const MOVIE: &str = "movie";
    pub const MOVIES: &str = "movies";
    pub const REVIEW: &str = "review";
    pub const VOTE: &str = "vote";
    pub const MESSAGE: &str = "message";
    pub const SUCCESS: &str = "success";
    pub const ERRORS: &str = "errors";
    pub const ERROR: &str = "error";
    pub const LOGOUT: &str = "logout";
    pub const PRINCIPAL: &str = "principal";
}

/// Messages shown to users
pub mod message {
    pub const MOVIE_NOT_FOUND: &str = "Movie not Found!";
    pub const USER_NOT_FOUND: &str = "User not Found!";
    pub const SUCCESS: &str = "Success";
    pub const FAIL: &str = "Sorry! Something went wrong";

    pub const TITLE_MIN: &str = "Title must be at least one character!";
    pub const COMMENT_MIN: &str = "Comment must be at least one character!";
    pub const USER_MIN: &str = "User Name must be at least four characters!";
    pub const USER_EXISTS: &str = "User Name already exists!";
    pub const EMAIL_INVALID: &str = "Invalid Email Address!";
    pub const EMAIL_EXISTS: &str = "Email is already in use!";
    pub const PASSWORD_MIN: &str = "Password must be at least six characters!";
    pub const DATE_INVALID: &str = "Published date must be formatted as YYYY-MM-DD!";
    pub const RATING_RANGE: &str = "Rating must be between one and five!";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_redirects_are_query_encoded() {
        assert_eq!(
            redirect::movies_with_message(message::MOVIE_NOT_FOUND),
            "/movies?message=Movie%20not%20Found%21"
        );
        assert_eq!(
            redirect::users_with_message(message::SUCCESS),
            "/users?message=Success"
        );
    }

    #[test]
    fn test_movie_redirect() {
        assert_eq!(redirect::movie("tt0111161"), "/movie/tt0111161");
        assert_eq!(redirect::movie("a\nb/c"), "/movie/a%0Ab%2Fc");
    }
}

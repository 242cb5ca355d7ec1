use yatube_core::services::PASSWORD_MIN_LEN;

use super::{escape, layout};
use crate::urls;

fn error_block(error: Option<&str>) -> String {
    error
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape(message)))
        .unwrap_or_default()
}

pub fn login_page(username: &str, next: &str, error: Option<&str>) -> String {
    let body = format!(
        "<h1>Log in</h1>\n{}<form method=\"post\" action=\"{}\">\n\
         <input type=\"hidden\" name=\"next\" value=\"{}\">\n\
         <label for=\"id_username\">Username</label>\n<input name=\"username\" id=\"id_username\" value=\"{}\" required>\n\
         <label for=\"id_password\">Password</label>\n<input type=\"password\" name=\"password\" id=\"id_password\" required>\n\
         <button type=\"submit\">Log in</button>\n</form>\n\
         <p>No account? <a href=\"{}\">Sign up</a></p>",
        error_block(error),
        urls::LOGIN,
        escape(next),
        escape(username),
        urls::SIGNUP,
    );
    layout("Log in", None, &body)
}

pub fn signup_page(username: &str, error: Option<&str>) -> String {
    let body = format!(
        "<h1>Sign up</h1>\n{}<form method=\"post\" action=\"{}\">\n\
         <label for=\"id_username\">Username</label>\n<input name=\"username\" id=\"id_username\" value=\"{}\" maxlength=\"150\" required>\n\
         <label for=\"id_password\">Password</label>\n<input type=\"password\" name=\"password\" id=\"id_password\" minlength=\"{PASSWORD_MIN_LEN}\" required>\n\
         <button type=\"submit\">Sign up</button>\n</form>",
        error_block(error),
        urls::SIGNUP,
        escape(username),
    );
    layout("Sign up", None, &body)
}

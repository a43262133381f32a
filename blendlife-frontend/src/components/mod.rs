mod comment_form;

pub use self::comment_form::*;

use crate::blog::{Post, Slug};
use crate::comment::{CommentForm, Field, FieldError, FormState};
use maud::{html, Markup, DOCTYPE};

pub mod portable_text;

/// Banner shown after a submission finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Submitted,
    SubmitFailed,
}

impl Notice {
    fn message(self) -> &'static str {
        match self {
            Notice::Submitted => "Thank you for submitting your comment! It will appear once it has been approved.",
            Notice::SubmitFailed => "Your comment could not be submitted, please try again later.",
        }
    }
}

/// What the comment form shows on this render.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub form: CommentForm,
    pub errors: Vec<FieldError>,
    pub notice: Option<Notice>,
}

impl FormView {
    pub fn idle(post: &Post) -> FormView {
        FormView {
            form: CommentForm::for_post(post.id.clone()),
            errors: Vec::new(),
            notice: None,
        }
    }

    /// View after a submit attempt ended in `state`. Invalid forms keep what
    /// was typed; finished submissions start over with a blank form.
    pub fn after(post: &Post, form: CommentForm, state: FormState) -> FormView {
        let notice = match &state {
            FormState::SubmittedOk => Some(Notice::Submitted),
            FormState::SubmittedError => Some(Notice::SubmitFailed),
            _ => None,
        };

        match state.settle() {
            FormState::Invalid(errors) => FormView {
                form: CommentForm {
                    post_id: post.id.clone(),
                    ..form
                },
                errors,
                notice,
            },
            _ => FormView {
                notice,
                ..FormView::idle(post)
            },
        }
    }

    fn has_error(&self, field: Field) -> bool {
        self.errors.iter().any(|err| err.0 == field)
    }
}

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                main {
                    header { p { "Blog" } }
                    (content)
                }
            }
        }
    }
}

pub fn post_page(post: &Post, view: &FormView) -> Markup {
    let content = html! {
        article class="max-w-3xl mx-auto p-5" {
            h1 class="text-3xl mt-10 mb-3" { (post.title) }
            @if let Some(description) = &post.description {
                h2 class="text-xl font-light" { (description) }
            }
            div {
                @if let Some(author) = &post.author {
                    p class="font-extralight text-sm" {
                        "Blog post by "
                        span class="text-green-600" { (author.name) }
                        " - Published at "
                        time datetime=(post.created_at.to_rfc3339()) {
                            (post.created_at.format("%B %-d, %Y").to_string())
                        }
                    }
                }
            }
            div { (portable_text::render(&post.body)) }
        }
        hr class="max-w-lg my-5 mx-auto border border-gray-500";
        (comment_form(&post.slug, view))
        (comment_list(post))
    };

    layout(&post.title, content)
}

fn comment_form(slug: &Slug, view: &FormView) -> Markup {
    html! {
        @if let Some(notice) = view.notice {
            @let class = match notice {
                Notice::Submitted => "notice text-green-600",
                Notice::SubmitFailed => "notice text-red-500",
            };
            p class=(class) { (notice.message()) }
        }
        form method="post" action={ "/post/" (slug.as_str()) } class="flex flex-col p-5 max-w-2xl mx-auto mb-10" {
            h3 class="text-sm text-blue-500" { "Enjoyed this article?" }
            h4 class="text-3xl font-bold" { "Leave a comment below!" }
            hr class="py-3 mt-2";
            input type="hidden" name="_id" value=(view.form.post_id);
            label class="block mb-5" for="name" {
                span class="text-gray-700" { "Name" }
                input id="name" name="name" type="text" placeholder="John Appleseed"
                    value=(view.form.name) aria-invalid[view.has_error(Field::Name)];
            }
            label class="block mb-5" for="email" {
                span class="text-gray-700" { "Email" }
                input id="email" name="email" type="email" placeholder="Enter your email here"
                    value=(view.form.email) aria-invalid[view.has_error(Field::Email)];
            }
            label class="block mb-5" for="comment" {
                span class="text-gray-700" { "Comment" }
                textarea id="comment" name="comment" rows="8" placeholder="Enter your comment here"
                    aria-invalid[view.has_error(Field::Comment)] { (view.form.comment) }
            }
            input type="submit";
        }
        @if !view.errors.is_empty() {
            div class="flex flex-col p-5" {
                @for error in &view.errors {
                    span class="field-error text-red-500" { (error.to_string()) }
                }
            }
        }
    }
}

fn comment_list(post: &Post) -> Markup {
    html! {
        @if !post.comments.is_empty() {
            section class="flex flex-col p-10 my-10 max-w-2xl mx-auto" {
                h3 class="text-4xl" { "Comments" }
                hr class="pb-2";
                @for comment in &post.comments {
                    p class="comment" {
                        span class="text-yellow-500" { (comment.name) ": " }
                        (comment.comment)
                    }
                }
            }
        }
    }
}

pub fn not_found_page(slug: &str) -> Markup {
    layout(
        "Not found",
        html! {
            article class="max-w-3xl mx-auto p-5" {
                h1 { "404 - This post could not be found" }
                p { "There is no post at " code { "/post/" (slug) } "." }
            }
        },
    )
}

pub fn unavailable_page() -> Markup {
    layout(
        "Unavailable",
        html! {
            article class="max-w-3xl mx-auto p-5" {
                h1 { "This post cannot be loaded right now" }
                p { "Please try again in a moment." }
            }
        },
    )
}

//! Posts reducer.
//!
//! Feed and post-detail state. Like and comment mutations answer with the
//! replacement collection, which is written over the matching post.

use crate::actions::{AppAction, PostAction};
use crate::constants::endpoints;
use crate::environment::ClientEnvironment;
use crate::error::decode;
use crate::providers::{ApiClient, ConfirmPrompt, Method, Navigator};
use crate::reducers::{field_error_alerts, show_alert};
use crate::state::{AlertKind, Comment, Like, Post, PostsState};
use std::marker::PhantomData;
use worknet_core::effect::{ActionBatch, Effect};
use worknet_core::environment::{Clock, IdGenerator};
use worknet_core::reducer::Reducer;
use worknet_core::{SmallVec, smallvec};

/// Posts reducer.
#[derive(Debug, Clone)]
pub struct PostReducer<A, N, P, C, I> {
    /// Phantom data to hold type parameters.
    _phantom: PhantomData<(A, N, P, C, I)>,
}

impl<A, N, P, C, I> PostReducer<A, N, P, C, I> {
    /// Create a new posts reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, N, P, C, I> Default for PostReducer<A, N, P, C, I> {
    fn default() -> Self {
        Self::new()
    }
}

fn failure(err: &crate::error::RequestError) -> ActionBatch<AppAction> {
    smallvec![AppAction::Posts(PostAction::Failed(err.to_error_info()))]
}

fn validation_failure(err: &crate::error::RequestError) -> ActionBatch<AppAction> {
    let mut batch: ActionBatch<AppAction> = field_error_alerts(err).into_iter().collect();
    batch.push(AppAction::Posts(PostAction::Failed(err.to_error_info())));
    batch
}

impl<A, N, P, C, I> Reducer for PostReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    type State = PostsState;
    type Action = AppAction;
    type Environment = ClientEnvironment<A, N, P, C, I>;

    #[allow(clippy::too_many_lines)] // one arm per operation of the slice
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let AppAction::Posts(action) = action else {
            return smallvec![Effect::None];
        };

        match action {
            // ═══════════════════════════════════════════════════════════
            // Commands
            // ═══════════════════════════════════════════════════════════
            PostAction::FetchAll => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api.get(endpoints::POSTS).await.and_then(decode::<Vec<Post>>) {
                        Ok(posts) => smallvec![AppAction::Posts(PostAction::Loaded(posts))],
                        Err(err) => failure(&err),
                    }
                })]
            },

            PostAction::Fetch { id } => {
                let api = env.api.clone();
                let path = endpoints::post(&id);
                smallvec![Effect::future(async move {
                    match api.get(&path).await.and_then(decode::<Post>) {
                        Ok(post) => smallvec![AppAction::Posts(PostAction::PostLoaded(post))],
                        Err(err) => failure(&err),
                    }
                })]
            },

            PostAction::Add(form) => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let body = serde_json::to_value(&form).unwrap_or(serde_json::Value::Null);
                    match api
                        .post(endpoints::POSTS, body)
                        .await
                        .and_then(decode::<Post>)
                    {
                        Ok(post) => smallvec![
                            AppAction::Posts(PostAction::Added(post)),
                            show_alert("Post Created", AlertKind::Success),
                        ],
                        Err(err) => validation_failure(&err),
                    }
                })]
            },

            PostAction::Delete { id } => {
                let api = env.api.clone();
                let path = endpoints::post(&id);
                smallvec![Effect::future(async move {
                    match api.delete(&path).await {
                        Ok(_) => smallvec![
                            AppAction::Posts(PostAction::Deleted { id }),
                            show_alert("Post Removed", AlertKind::Success),
                        ],
                        Err(err) => failure(&err),
                    }
                })]
            },

            PostAction::Like { id } => {
                let api = env.api.clone();
                let path = endpoints::like(&id);
                smallvec![Effect::future(async move {
                    match api
                        .request(Method::Put, &path, None)
                        .await
                        .and_then(decode::<Vec<Like>>)
                    {
                        Ok(likes) => {
                            smallvec![AppAction::Posts(PostAction::LikesUpdated { id, likes })]
                        },
                        Err(err) => failure(&err),
                    }
                })]
            },

            PostAction::Unlike { id } => {
                let api = env.api.clone();
                let path = endpoints::unlike(&id);
                smallvec![Effect::future(async move {
                    match api
                        .request(Method::Put, &path, None)
                        .await
                        .and_then(decode::<Vec<Like>>)
                    {
                        Ok(likes) => {
                            smallvec![AppAction::Posts(PostAction::LikesUpdated { id, likes })]
                        },
                        Err(err) => failure(&err),
                    }
                })]
            },

            PostAction::AddComment { id, form } => {
                let api = env.api.clone();
                let path = endpoints::comment(&id);
                smallvec![Effect::future(async move {
                    let body = serde_json::to_value(&form).unwrap_or(serde_json::Value::Null);
                    match api.post(&path, body).await.and_then(decode::<Vec<Comment>>) {
                        Ok(comments) => smallvec![
                            AppAction::Posts(PostAction::CommentsUpdated { id, comments }),
                            show_alert("Comment Added", AlertKind::Success),
                        ],
                        Err(err) => validation_failure(&err),
                    }
                })]
            },

            PostAction::DeleteComment { id, comment_id } => {
                let api = env.api.clone();
                let path = endpoints::comment_item(&id, &comment_id);
                smallvec![Effect::future(async move {
                    match api.delete(&path).await.and_then(decode::<Vec<Comment>>) {
                        Ok(comments) => smallvec![
                            AppAction::Posts(PostAction::CommentsUpdated { id, comments }),
                            show_alert("Comment Removed", AlertKind::Success),
                        ],
                        Err(err) => failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            PostAction::Loaded(posts) => {
                state.posts = posts;
                state.loading = false;
                smallvec![Effect::None]
            },

            PostAction::PostLoaded(post) => {
                state.post = Some(post);
                state.loading = false;
                smallvec![Effect::None]
            },

            PostAction::Added(post) => {
                state.posts.insert(0, post);
                state.loading = false;
                smallvec![Effect::None]
            },

            PostAction::Deleted { id } => {
                state.posts.retain(|post| post.id != id);
                state.loading = false;
                smallvec![Effect::None]
            },

            // Both the feed copy and the loaded detail view carry likes.
            PostAction::LikesUpdated { id, likes } => {
                if let Some(post) = state.post.as_mut().filter(|post| post.id == id) {
                    post.likes = likes.clone();
                }
                if let Some(post) = state.posts.iter_mut().find(|post| post.id == id) {
                    post.likes = likes;
                }
                state.loading = false;
                smallvec![Effect::None]
            },

            PostAction::CommentsUpdated { id, comments } => {
                if let Some(post) = state.post.as_mut().filter(|post| post.id == id) {
                    post.comments = comments;
                }
                state.loading = false;
                smallvec![Effect::None]
            },

            PostAction::Failed(info) => {
                state.error = info;
                state.loading = false;
                smallvec![Effect::None]
            },
        }
    }
}

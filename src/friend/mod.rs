mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;

pub use core::{
    Friend, FriendBalance, FriendId, FriendState, count_friends, create_friend,
    create_friend_table, get_friend,
};
pub use create_endpoint::create_friend_endpoint;
pub use delete_endpoint::delete_friend_endpoint;
pub use edit_endpoint::edit_friend_endpoint;
pub use get_endpoint::{get_friend_endpoint, get_friend_expenses_endpoint, get_friends_endpoint};

mod guards;
mod pipeline;
mod retry;

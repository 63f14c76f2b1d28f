pub mod option_button;
pub mod progress_bar;
pub mod results_card;
pub mod timer_badge;

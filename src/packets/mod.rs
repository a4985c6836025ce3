pub mod error;
pub mod outbound;
pub mod packet_list;
pub mod raw_packet;
pub mod status;

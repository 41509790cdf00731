use std::mem;
use std::pin::Pin;

use futures_util::{Stream, StreamExt, stream};

pub fn lines<S, B, E>(chunks: S) -> impl Stream<Item = Result<Vec<u8>, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let state: Option<(Pin<Box<S>>, Vec<u8>)> = Some((Box::pin(chunks), Vec::new()));

    stream::unfold(state, |state| async move {
        let (mut chunks, mut buffer) = state?;

        loop {
            if let Some(index) = buffer.iter().position(|&byte| byte == b'\n') {
                let mut line = buffer.drain(..=index).collect::<Vec<_>>();
                line.pop();
                strip_carriage_return(&mut line);
                return Some((Ok(line), Some((chunks, buffer))));
            }

            match chunks.next().await {
                Some(Ok(chunk)) => buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(err)) => return Some((Err(err), None)),
                None if buffer.is_empty() => return None,
                None => {
                    let mut line = mem::take(&mut buffer);
                    strip_carriage_return(&mut line);
                    return Some((Ok(line), None));
                }
            }
        }
    })
}

fn strip_carriage_return(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
}

use anyhow::Result;
use aula_client::Client;
use log::debug;
use std::sync::mpsc::{channel, Receiver, Sender};

use super::{Event, Request};
use crate::event::{Event as CrateEvent, EventBus};

/// Performs requests it receives from the main thread, and sends the results back.
pub struct Worker {
    client: Client,
    msg_recv: Receiver<Request>,
    event_send: Sender<CrateEvent>,
}

impl Worker {
    /// Spawn the store worker on the given event bus, returning a channel to send requests down.
    pub(crate) fn spawn_on(bus: &EventBus, client: Client) -> Result<Sender<Request>> {
        let (cmd_send, cmd_recv) = channel();

        bus.spawn("store_worker", move |_, event_send| {
            // we stop when the store drops its sender, so we don't need to check running
            Worker {
                client,
                msg_recv: cmd_recv,
                event_send,
            }
            .main()
        })?;

        Ok(cmd_send)
    }

    fn main(self) {
        while let Ok(msg) = self.msg_recv.recv() {
            debug!("received message: {:?}", msg);
            let message = msg.failure_message();
            let event = match self.process_msg(msg) {
                Ok(e) => e,
                Err(error) => {
                    let message = match &error {
                        aula_client::Error::HTTPError(_) if self.client.health().is_err() => {
                            "The gateway can't be reached"
                        }
                        _ => message,
                    };
                    Event::Error { message, error }
                }
            };

            if let Err(e) = self.event_send.send(CrateEvent::Store(event)) {
                debug!("error sending event: {:?}", e);
                break;
            }
        }

        debug!("shutting down");
    }

    fn process_msg(&self, msg: Request) -> Result<Event, aula_client::Error> {
        match msg {
            Request::Courses(criteria) => Ok(Event::Courses(self.client.search_courses(&criteria)?)),
            Request::Roles => Ok(Event::Roles {
                admin: self.client.is_admin(),
            }),
            Request::Enroll(id) => {
                self.client.enroll(id)?;
                Ok(Event::Enrolled(id))
            }
            Request::Unenroll(id) => {
                self.client.unenroll(id)?;
                Ok(Event::Unenrolled(id))
            }
            Request::Progress(id) => Ok(Event::Progress(id, self.client.student_progress(id)?)),
            Request::CompleteLesson {
                course_id,
                lesson_id,
            } => {
                self.client.mark_lesson_completed(course_id, lesson_id)?;
                Ok(Event::LessonCompleted {
                    course_id,
                    lesson_id,
                })
            }
            Request::Reviews(id) => Ok(Event::Reviews(id, self.client.course_reviews(id)?)),
            Request::CreateReview(draft) => {
                Ok(Event::ReviewCreated(self.client.create_review(&draft)?))
            }
            Request::CreateCourse(draft) => {
                self.client.create_course(&draft)?;
                Ok(Event::Changed("Course created"))
            }
            Request::UpdateCourse(id, draft) => {
                self.client.update_course(id, &draft)?;
                Ok(Event::Changed("Course saved"))
            }
            Request::DeleteCourse(id) => {
                self.client.delete_course(id)?;
                Ok(Event::Changed("Course deleted"))
            }
            Request::UpdateQuota(id, seats) => {
                self.client.update_quota(id, seats)?;
                Ok(Event::Changed("Seats updated"))
            }
            Request::AddModule(course_id, draft) => {
                self.client.add_module(course_id, &draft)?;
                Ok(Event::Changed("Module added"))
            }
            Request::UpdateModule(id, draft) => {
                self.client.update_module(id, &draft)?;
                Ok(Event::Changed("Module saved"))
            }
            Request::SaveModules(modules) => {
                for (id, draft) in modules.iter() {
                    self.client.update_module(*id, draft)?;
                }
                Ok(Event::Changed("Module order saved"))
            }
            Request::DeleteModule(id) => {
                self.client.delete_module(id)?;
                Ok(Event::Changed("Module deleted"))
            }
            Request::AddLesson(module_id, record) => {
                self.client.add_lesson(module_id, &record)?;
                Ok(Event::Changed("Lesson added"))
            }
            Request::DeleteLesson(id) => {
                self.client.delete_lesson(id)?;
                Ok(Event::Changed("Lesson deleted"))
            }
            Request::Logout => {
                self.client.logout()?;
                Ok(Event::LoggedOut)
            }
        }
    }
}
